use crate::config::JoinConfig;
use crate::error::{Error, Result, Step};
use crate::state::{transition, Effect, LinkEvent, LinkState};
use log::*;
use std::fmt::Display;
use std::net::Ipv4Addr;
use std::sync::mpsc::Receiver;

/// Issues join requests to the radio in station mode.
pub trait Station {
    type Error: Display;
    fn request_join(&mut self, config: &JoinConfig) -> std::result::Result<(), Self::Error>;
}

/// Starts and stops the request server. `Server` is the live instance;
/// handing it back to `stop` ends it.
pub trait ServerControl {
    type Server;
    type Error: Display;
    fn start(&mut self) -> std::result::Result<Self::Server, Self::Error>;
    fn stop(&mut self, server: Self::Server) -> std::result::Result<(), Self::Error>;
}

/// Owns the join lifecycle and the single server slot.
pub struct Monitor<S: Station, C: ServerControl> {
    config: JoinConfig,
    station: S,
    control: C,
    state: LinkState,
    server: Option<C::Server>,
    address: Option<Ipv4Addr>,
    joins_requested: u32,
}

impl<S: Station, C: ServerControl> Monitor<S, C> {
    pub fn new(config: JoinConfig, station: S, control: C) -> Self {
        Self {
            config,
            station,
            control,
            state: LinkState::Idle,
            server: None,
            address: None,
            joins_requested: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn server_active(&self) -> bool {
        self.server.is_some()
    }

    pub fn address(&self) -> Option<Ipv4Addr> {
        self.address
    }

    pub fn joins_requested(&self) -> u32 {
        self.joins_requested
    }

    pub fn handle(&mut self, event: LinkEvent) -> Result<()> {
        match event {
            LinkEvent::StationStarted => info!("STA_START"),
            LinkEvent::AddressAcquired(ip) => {
                info!("STA_GOT_IP");
                info!("Got IP: '{}'", ip);
                self.address = Some(ip);
            }
            LinkEvent::StationDisconnected => {
                info!("STA_DISCONNECTED");
                self.address = None;
            }
            LinkEvent::Other => (),
        }
        let t = transition(self.state, event, self.server_active());
        for effect in t.effects {
            self.apply(effect)?;
        }
        if t.next != self.state {
            debug!("link {:?} => {:?}", self.state, t.next);
        }
        self.state = t.next;
        Ok(())
    }

    fn apply(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::RequestJoin => {
                self.station
                    .request_join(&self.config)
                    .map_err(|e| Error::fatal(Step::Join, e))?;
                self.joins_requested += 1;
            }
            Effect::StartServer => {
                if self.server.is_none() {
                    let server = self
                        .control
                        .start()
                        .map_err(|e| Error::fatal(Step::ServerStart, e))?;
                    self.server = Some(server);
                } else {
                    warn!("server already running, not starting another");
                }
            }
            Effect::StopServer => {
                if let Some(server) = self.server.take() {
                    self.control
                        .stop(server)
                        .map_err(|e| Error::fatal(Step::ServerStop, e))?;
                }
            }
        }
        Ok(())
    }

    /// Applies events until every sender is gone. Returns early on a fatal error.
    pub fn run(&mut self, events: Receiver<LinkEvent>) -> Result<()> {
        while let Ok(event) = events.recv() {
            self.handle(event)?;
        }
        Ok(())
    }

    /// Stops the server if one is running, then returns the collaborators.
    pub fn into_parts(mut self) -> Result<(S, C)> {
        if let Some(server) = self.server.take() {
            self.control
                .stop(server)
                .map_err(|e| Error::fatal(Step::ServerStop, e))?;
        }
        Ok((self.station, self.control))
    }
}
