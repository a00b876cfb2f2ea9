use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    Joining,
    Joined,
}

/// Link-layer notifications delivered by the network stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    StationStarted,
    AddressAcquired(Ipv4Addr),
    StationDisconnected,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RequestJoin,
    StartServer,
    StopServer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: LinkState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: LinkState, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }
}

pub fn transition(state: LinkState, event: LinkEvent, server_active: bool) -> Transition {
    match event {
        LinkEvent::StationStarted => Transition::to(LinkState::Joining, vec![Effect::RequestJoin]),
        LinkEvent::AddressAcquired(_) => {
            let effects = if server_active {
                Vec::new()
            } else {
                vec![Effect::StartServer]
            };
            Transition::to(LinkState::Joined, effects)
        }
        LinkEvent::StationDisconnected => {
            // rejoin goes out before the server is torn down
            let mut effects = vec![Effect::RequestJoin];
            if server_active {
                effects.push(Effect::StopServer);
            }
            Transition::to(LinkState::Joining, effects)
        }
        LinkEvent::Other => Transition::to(state, Vec::new()),
    }
}
