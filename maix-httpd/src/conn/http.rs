use anyhow::Result;
use embedded_svc::http::server::{Request, Response};
use embedded_svc::http::Headers;
use embedded_svc::io::Write;
use esp_idf_svc::http::server::{Configuration, EspHttpConnection, EspHttpServer};
use esp_idf_svc::http::Method;
use log::*;
use maix_httpd_link::ServerControl;
use maix_httpd_parser::{handle_index_request, ChunkSink, RequestContext, Responder};

/// Starts the JSON command server on `GET /`; stopping drops it.
pub struct HttpControl;

impl ServerControl for HttpControl {
    type Server = EspHttpServer<'static>;
    type Error = anyhow::Error;

    fn start(&mut self) -> Result<EspHttpServer<'static>> {
        let conf = Configuration::default();
        info!("Starting server on port: '{}'", conf.http_port);
        let mut server = EspHttpServer::new(&conf)?;
        info!("Registering URI handlers");
        server.fn_handler("/", Method::Get, |request| {
            let ctx = RequestContext::new(request.header("Host"), request.uri());
            if handle_index_request(&ctx, IndexRequest(request))?.is_none() {
                debug!("no query string, empty response");
            }
            Ok(())
        })?;
        Ok(server)
    }

    fn stop(&mut self, server: EspHttpServer<'static>) -> Result<()> {
        info!("Stopping server");
        drop(server);
        Ok(())
    }
}

struct IndexRequest<'a, 'r>(Request<&'a mut EspHttpConnection<'r>>);

struct JsonBody<'a, 'r>(Response<&'a mut EspHttpConnection<'r>>);

impl<'a, 'r> Responder for IndexRequest<'a, 'r> {
    type Error = anyhow::Error;
    type Sink = JsonBody<'a, 'r>;

    fn json(self) -> Result<JsonBody<'a, 'r>> {
        let response = self
            .0
            .into_response(200, None, &[("Content-Type", "application/json")])?;
        Ok(JsonBody(response))
    }
}

// each write goes out as its own HTTP chunk
impl<'a, 'r> ChunkSink for JsonBody<'a, 'r> {
    type Error = anyhow::Error;

    fn send_chunk(&mut self, chunk: &str) -> Result<()> {
        self.0.write_all(chunk.as_bytes())?;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.0.flush()?;
        Ok(())
    }
}
