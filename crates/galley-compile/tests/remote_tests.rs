use galley_compile::{CompileError, PdfService};
use std::thread;
use tiny_http::{Method, Response, Server};

fn spawn_server() -> (Server, u16) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    (server, port)
}

#[tokio::test]
async fn remote_mode_returns_the_response_body_verbatim() {
    let (server, port) = spawn_server();
    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        assert_eq!(*request.method(), Method::Post);

        let mut body = String::new();
        request.as_reader().read_to_string(&mut body).unwrap();
        assert!(body.contains("\"markup\""));
        assert!(body.contains("hello"));

        request
            .respond(Response::from_data(b"%PDF-1.7 remote".to_vec()))
            .unwrap();
    });

    let service = PdfService::remote(format!("http://127.0.0.1:{port}/compile"));
    let bytes = service
        .compile_markup("\\begin{document}hello\\end{document}")
        .await
        .unwrap();
    assert_eq!(bytes, b"%PDF-1.7 remote");
    handle.join().unwrap();
}

#[tokio::test]
async fn remote_failure_surfaces_status_and_body() {
    let (server, port) = spawn_server();
    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        let response = Response::from_string("engine pool exhausted").with_status_code(503);
        request.respond(response).unwrap();
    });

    let service = PdfService::remote(format!("http://127.0.0.1:{port}/compile"));
    let err = service.compile_markup("hello").await.unwrap_err();
    match err {
        CompileError::Remote { status, message } => {
            assert_eq!(status, Some(503));
            assert_eq!(message, "engine pool exhausted");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
    handle.join().unwrap();
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_failure() {
    // Bind then drop so the port is known to refuse connections.
    let (server, port) = spawn_server();
    drop(server);

    let service = PdfService::remote(format!("http://127.0.0.1:{port}/compile"));
    let err = service.compile_markup("hello").await.unwrap_err();
    match err {
        CompileError::Remote { status: None, .. } => {}
        other => panic!("expected a transport-level Remote error, got {other:?}"),
    }
}
