//! An example assembling a server request from environment data and saving its upload.

use httpmsg_rs::{Environment, FileTree, Message, RequestAssembler, RequestMessage};
use indexmap::IndexMap;
use log::info;
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    // Stage an uploaded file the way a web server would
    let dir = tempfile::tempdir()?;
    let temporary = dir.path().join("upload.tmp");
    std::fs::write(&temporary, "Hello from the client")?;

    let env = Environment::from_json(
        &json!({
            "server": {
                "REQUEST_METHOD": "POST",
                "SERVER_PROTOCOL": "HTTP/1.1",
                "HTTP_HOST": "example.com:8080",
                "REQUEST_URI": "/profile?tab=avatar",
                "HTTP_ACCEPT_LANGUAGE": "en-US",
                "CONTENT_TYPE": "multipart/form-data"
            },
            "get": {"tab": "avatar"},
            "post": {"name": "Jane"},
            "cookie": {"session": "abc123"},
            "files": {
                "avatar": {
                    "tmp_name": temporary,
                    "name": "avatar.txt",
                    "type": "text/plain",
                    "error": 0,
                    "size": 21
                }
            }
        })
        .to_string(),
    )?;

    let request = RequestAssembler::new(env).assemble(IndexMap::new())?;
    let request = request.with_attribute("user_id", 42);

    println!("{} {} HTTP/{}", request.method(), request.request_target(), request.protocol_version());
    println!("URI: {}", request.uri());
    println!("Headers:");
    for (name, values) in request.headers().iter() {
        println!("  {}: {}", name, values.join(", "));
    }
    println!("Parsed body: {:?}", request.parsed_body());
    println!("Attribute user_id: {:?}", request.attribute("user_id"));

    // Move the upload out of the temporary location
    if let Some(file) = request.uploaded_files().get("avatar").and_then(FileTree::as_file) {
        let target = dir.path().join("saved.txt");
        file.move_to(&target)?;
        info!("Saved {:?} to {:?}", file.client_filename(), target);
        println!("Saved upload: {}", std::fs::read_to_string(&target)?);

        // A second move is refused
        if let Err(err) = file.move_to(dir.path().join("again.txt")) {
            println!("Expected error moving twice: {}", err);
        }
    }

    Ok(())
}
