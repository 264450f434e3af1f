// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! In-memory collaborators for driving whole nodes on the host.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use orientation_sync::config::{GameConfig, Role, FOLLOWER_ID, HUB_ID, LEADER_ID};
use orientation_sync::game::{Event, Orientation, ParticipantId, SyncMachine};
use orientation_sync::io::{Cue, Indicator, OrientationSource, PeripheralSink, Screen, Transport};
use orientation_sync::protocol::{Envelope, Message};

pub const ROUNDS: usize = 2;
pub const NODES: usize = 2;

pub const TARGETS: [Orientation; ROUNDS] = [Orientation::new(0, 0, 10), Orientation::new(0, 0, 20)];

pub const OFF_TARGET: Orientation = Orientation::new(30, -30, 90);

pub type Node = SyncMachine<FakeSensor, RecordingPanel, NetPort, FakeDelay, ROUNDS, NODES>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Sensor
// ============================================================================

#[derive(Default)]
pub struct FakeSensor {
    pub value: Orientation,
}

impl OrientationSource for FakeSensor {
    fn sample(&mut self) -> Orientation {
        self.value
    }
}

// ============================================================================
// Panel
// ============================================================================

pub struct RecordingPanel {
    pub ready: bool,
    pub screens: Vec<Screen>,
    pub cues: Vec<Cue>,
    indicators: Vec<(Indicator, bool)>,
}

impl Default for RecordingPanel {
    fn default() -> Self {
        Self {
            ready: true,
            screens: Vec::new(),
            cues: Vec::new(),
            indicators: Vec::new(),
        }
    }
}

impl RecordingPanel {
    pub fn last_screen(&self) -> Option<Screen> {
        self.screens.last().copied()
    }

    /// Last commanded state, off if never set.
    pub fn indicator(&self, indicator: Indicator) -> bool {
        self.indicators
            .iter()
            .rev()
            .find(|(i, _)| *i == indicator)
            .map_or(false, |(_, on)| *on)
    }
}

impl PeripheralSink for RecordingPanel {
    fn ready(&mut self) -> bool {
        self.ready
    }

    fn render(&mut self, screen: Screen) {
        self.screens.push(screen);
    }

    fn play_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        self.indicators.push((indicator, on));
    }
}

// ============================================================================
// Delay
// ============================================================================

/// Returns immediately, remembers how long it was asked to wait.
#[derive(Default)]
pub struct FakeDelay {
    pub slept_ms: u32,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.slept_ms += ms;
    }
}

// ============================================================================
// Network
// ============================================================================

/// Shared air between nodes. Frames can be dropped on purpose to model loss.
#[derive(Default)]
pub struct Network {
    inboxes: HashMap<ParticipantId, VecDeque<Envelope>>,
    /// Every envelope handed to the network, delivered or not.
    pub sent: Vec<Envelope>,
    drop_next: usize,
}

impl Network {
    pub fn shared() -> Rc<RefCell<Network>> {
        Rc::new(RefCell::new(Network::default()))
    }

    /// Lose the next `n` sends.
    pub fn drop_next(&mut self, n: usize) {
        self.drop_next = n;
    }

    pub fn pending(&self, id: ParticipantId) -> usize {
        self.inboxes.get(&id).map_or(0, VecDeque::len)
    }

    /// Put a frame on the air as if `envelope.from` had sent it.
    pub fn inject(&mut self, envelope: Envelope) {
        self.inboxes.entry(envelope.to).or_default().push_back(envelope);
    }

    pub fn sent_to(&self, id: ParticipantId) -> Vec<Message> {
        self.sent
            .iter()
            .filter(|e| e.to == id)
            .map(|e| e.message)
            .collect()
    }
}

pub struct NetPort {
    net: Rc<RefCell<Network>>,
    local: ParticipantId,
}

impl NetPort {
    pub fn new(net: &Rc<RefCell<Network>>, local: ParticipantId) -> Self {
        Self {
            net: Rc::clone(net),
            local,
        }
    }
}

impl Transport for NetPort {
    fn send(&mut self, to: ParticipantId, message: &Message) {
        let envelope = Envelope {
            to,
            from: self.local,
            message: *message,
        };
        let mut net = self.net.borrow_mut();
        net.sent.push(envelope);
        if net.drop_next > 0 {
            net.drop_next -= 1;
            return;
        }
        net.inject(envelope);
    }

    fn receive(&mut self) -> Option<Envelope> {
        self.net
            .borrow_mut()
            .inboxes
            .get_mut(&self.local)
            .and_then(VecDeque::pop_front)
    }
}

// ============================================================================
// Nodes
// ============================================================================

pub fn leader_config() -> GameConfig<ROUNDS, NODES> {
    GameConfig {
        role: Role::Leader,
        local_id: LEADER_ID,
        upstream: HUB_ID,
        participants: [LEADER_ID, FOLLOWER_ID],
        targets: TARGETS,
        tolerance: 2,
        countdown_steps: 3,
        countdown_step_ms: 1_000,
        sample_interval_ms: 100,
    }
}

pub fn follower_config() -> GameConfig<ROUNDS, NODES> {
    GameConfig {
        role: Role::Follower { leader: LEADER_ID },
        local_id: FOLLOWER_ID,
        ..leader_config()
    }
}

pub fn node(net: &Rc<RefCell<Network>>, config: GameConfig<ROUNDS, NODES>) -> Node {
    let port = NetPort::new(net, config.local_id);
    SyncMachine::new(
        config,
        FakeSensor::default(),
        RecordingPanel::default(),
        port,
        FakeDelay::default(),
    )
    .expect("test config is valid")
}

/// Leader and follower on the same network, both through startup and staged.
pub fn started_pair() -> (Rc<RefCell<Network>>, Node, Node) {
    init_logging();
    let net = Network::shared();
    let mut leader = node(&net, leader_config());
    let mut follower = node(&net, follower_config());
    orientation_sync::startup::start(&mut leader, |_| Ok::<(), ()>(())).unwrap();
    orientation_sync::startup::start(&mut follower, |_| Ok::<(), ()>(())).unwrap();
    (net, leader, follower)
}

/// Point both sensors at `target`.
pub fn aim(nodes: &mut [&mut Node], target: Orientation) {
    for node in nodes.iter_mut() {
        node.sensor_mut().value = target;
    }
}

/// Press a button on `node` and run its loop once.
pub fn press(node: &mut Node, event: Event, now_ms: u32) {
    node.post(event).unwrap();
    node.poll(now_ms);
}

pub fn submission(from: ParticipantId, participant: ParticipantId, round: u8) -> Event {
    Event::Received(Envelope {
        to: LEADER_ID,
        from,
        message: Message::Submission {
            participant,
            round,
            orientation: TARGETS[usize::from(round) % ROUNDS],
        },
    })
}

pub fn progress(round: u8) -> Event {
    Event::Received(Envelope {
        to: FOLLOWER_ID,
        from: LEADER_ID,
        message: Message::RoundProgress { round },
    })
}
