use crate::reply::Reply;
use log::*;

/// What the index handler reads from one request. Empty values count as
/// absent, the same as a zero-length header or query read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub host: Option<String>,
    pub query: Option<String>,
}

impl RequestContext {
    pub fn new(host: Option<&str>, uri: &str) -> Self {
        let host = host.filter(|h| !h.is_empty()).map(str::to_string);
        let query = uri
            .split_once('?')
            .map(|(_, q)| q)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Self { host, query }
    }
}

/// Receives a response body in pieces.
pub trait ChunkSink {
    type Error;
    fn send_chunk(&mut self, chunk: &str) -> Result<(), Self::Error>;
    /// Marks the end of the body.
    fn end(&mut self) -> Result<(), Self::Error>;
}

/// Turns a request into a 200 `application/json` response.
pub trait Responder {
    type Error;
    type Sink: ChunkSink<Error = Self::Error>;
    fn json(self) -> Result<Self::Sink, Self::Error>;
}

/// `GET /`. With no query string nothing is written and `Ok(None)` comes back.
pub fn handle_index_request<R: Responder>(
    ctx: &RequestContext,
    responder: R,
) -> Result<Option<Reply>, R::Error> {
    if let Some(host) = &ctx.host {
        info!("Found header => Host: {}", host);
    }
    let query = match &ctx.query {
        Some(q) => q,
        None => return Ok(None),
    };
    info!("Found URL query => {}", query);
    let reply = Reply::from_query(query);
    let mut sink = responder.json()?;
    reply.stream(&mut sink)?;
    // the responder consumed the request, its headers are gone
    debug!("Request headers lost");
    Ok(Some(reply))
}

#[cfg(test)]
mod tests {
    use crate::handler::*;

    #[derive(Default)]
    struct Exchange {
        opened: bool,
        chunks: Vec<String>,
        ended: bool,
    }

    struct MockResponder<'a>(&'a mut Exchange);

    struct MockSink<'a>(&'a mut Exchange);

    impl<'a> Responder for MockResponder<'a> {
        type Error = String;
        type Sink = MockSink<'a>;
        fn json(self) -> Result<MockSink<'a>, String> {
            self.0.opened = true;
            Ok(MockSink(self.0))
        }
    }

    impl<'a> ChunkSink for MockSink<'a> {
        type Error = String;
        fn send_chunk(&mut self, chunk: &str) -> Result<(), String> {
            if self.0.ended {
                return Err("chunk after end".to_string());
            }
            self.0.chunks.push(chunk.to_string());
            Ok(())
        }
        fn end(&mut self) -> Result<(), String> {
            self.0.ended = true;
            Ok(())
        }
    }

    fn run(host: Option<&str>, uri: &str) -> (Option<Reply>, Exchange) {
        let mut ex = Exchange::default();
        let ctx = RequestContext::new(host, uri);
        let reply = handle_index_request(&ctx, MockResponder(&mut ex)).expect("handler");
        (reply, ex)
    }

    #[test]
    fn test_context() {
        let ctx = RequestContext::new(Some("192.168.1.9"), "/?cmd=v");
        assert_eq!(ctx.host.as_deref(), Some("192.168.1.9"));
        assert_eq!(ctx.query.as_deref(), Some("cmd=v"));
        let ctx = RequestContext::new(Some(""), "/?");
        assert_eq!(ctx, RequestContext::default());
        let ctx = RequestContext::new(None, "/");
        assert_eq!(ctx.query, None);
    }

    #[test]
    fn test_streamed_fragments() {
        let (reply, ex) = run(Some("esp"), "/?cmd=xyz");
        assert_eq!(reply, Some(Reply::InvalidCmd("xyz".to_string())));
        assert!(ex.opened);
        assert!(ex.ended);
        assert_eq!(ex.chunks.first().map(String::as_str), Some("{"));
        assert_eq!(ex.chunks.last().map(String::as_str), Some("}"));
        assert!(ex.chunks.len() > 2);
        assert_eq!(ex.chunks.concat(), r#"{"err":"invalid cmd","cmd":"xyz"}"#);
    }

    #[test]
    fn test_replies() {
        let (_, ex) = run(None, "/?cmd=hello");
        assert_eq!(ex.chunks.concat(), r#"{"msg":"Hello World!"}"#);
        let (_, ex) = run(None, "/?cmd=v");
        assert_eq!(ex.chunks.concat(), r#"{"version":"1.0.0"}"#);
        let (reply, ex) = run(None, "/?foo=bar");
        assert_eq!(reply, Some(Reply::UnknownParam));
        assert_eq!(ex.chunks.concat(), r#"{"err":"unknown param"}"#);
        let uri = format!("/?cmd={}", "y".repeat(32));
        let (reply, _) = run(None, &uri);
        assert_eq!(reply, Some(Reply::UnknownParam));
    }

    #[test]
    fn test_no_query_writes_nothing() {
        for uri in ["/", "/?"] {
            let (reply, ex) = run(Some("esp"), uri);
            assert_eq!(reply, None);
            assert!(!ex.opened);
            assert!(ex.chunks.is_empty());
            assert!(!ex.ended);
        }
    }

    #[test]
    fn test_sink_error_propagates() {
        struct Broken;
        struct BrokenSink;
        impl Responder for Broken {
            type Error = &'static str;
            type Sink = BrokenSink;
            fn json(self) -> Result<BrokenSink, &'static str> {
                Ok(BrokenSink)
            }
        }
        impl ChunkSink for BrokenSink {
            type Error = &'static str;
            fn send_chunk(&mut self, _chunk: &str) -> Result<(), &'static str> {
                Err("connection reset")
            }
            fn end(&mut self) -> Result<(), &'static str> {
                Ok(())
            }
        }
        let ctx = RequestContext::new(None, "/?cmd=v");
        assert_eq!(handle_index_request(&ctx, Broken), Err("connection reset"));
    }
}
