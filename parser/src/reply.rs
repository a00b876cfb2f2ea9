use crate::handler::ChunkSink;
use crate::query::find_value;
use log::*;
use serde_json::Value;
use std::convert::Infallible;

pub const CMD_KEY: &str = "cmd";
pub const VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Hello,
    Version,
    Other(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(value: &'a str) -> Self {
        match value {
            "hello" => Command::Hello,
            "v" => Command::Version,
            other => Command::Other(other),
        }
    }
}

/// The body returned for one query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Hello,
    Version,
    InvalidCmd(String),
    UnknownParam,
}

impl Reply {
    pub fn from_query(query: &str) -> Self {
        match find_value(query, CMD_KEY) {
            Ok(value) => match Command::parse(value) {
                Command::Hello => Reply::Hello,
                Command::Version => Reply::Version,
                Command::Other(cmd) => Reply::InvalidCmd(cmd.to_string()),
            },
            Err(e) => {
                debug!("{}: {}", CMD_KEY, e);
                Reply::UnknownParam
            }
        }
    }

    /// Writes the body fragment by fragment, then ends it.
    pub fn stream<S: ChunkSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.send_chunk("{")?;
        match self {
            Reply::Hello => sink.send_chunk("\"msg\":\"Hello World!\"")?,
            Reply::Version => {
                sink.send_chunk("\"version\":\"")?;
                sink.send_chunk(VERSION)?;
                sink.send_chunk("\"")?;
            }
            Reply::InvalidCmd(cmd) => {
                sink.send_chunk("\"err\":\"invalid cmd\",\"cmd\":")?;
                // quoted and escaped
                sink.send_chunk(&Value::String(cmd.clone()).to_string())?;
            }
            Reply::UnknownParam => sink.send_chunk("\"err\":\"unknown param\"")?,
        }
        sink.send_chunk("}")?;
        sink.end()
    }

    pub fn body(&self) -> String {
        let mut body = String::new();
        match self.stream(&mut body) {
            Ok(()) => body,
            Err(never) => match never {},
        }
    }
}

impl ChunkSink for String {
    type Error = Infallible;
    fn send_chunk(&mut self, chunk: &str) -> Result<(), Infallible> {
        self.push_str(chunk);
        Ok(())
    }
    fn end(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
