use std::{
    collections::VecDeque,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread,
    time::{Duration, Instant},
};

use super::{
    AudioSink, Command, GameEvent, GameMachine, GameState, PlayMode, SettingsStore,
    StoredSettings, TimerId,
};

/// Message sent by a timer thread when it fires.
#[derive(Debug, Clone, Copy)]
struct TimerFired {
    timer: TimerId,
    generation: u64,
}

/// Spawns a timer thread and returns the sender that keeps it alive.
///
/// Dropping the returned sender stops the thread at its next wake-up.
fn spawn_timer(
    tx: Sender<TimerFired>,
    fired: TimerFired,
    interval: Duration,
    repeat: bool,
) -> Sender<()> {
    let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
    thread::spawn(move || {
        loop {
            match cancel_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if tx.send(fired).is_err() || !repeat {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    });
    cancel_tx
}

/// Executes the commands of a [`GameMachine`] against real timers and the host
/// collaborators.
///
/// All transitions run on the thread that owns the runtime, one event at a
/// time. Timer threads only enqueue "fired" messages. Every timer
/// identity carries a generation counter that is bumped whenever the timer is
/// started or cancelled, so a message that was already in flight when its
/// timer was replaced is dropped instead of being handled.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{
///     GameConfig, GameMachine, GameRuntime, MemorySettings, NullAudio, PieceGenerator, PlayMode,
/// };
///
/// let config = GameConfig::default().with_time_scale(0.01);
/// let machine = GameMachine::new(config, PieceGenerator::with_seed(5));
/// let mut runtime = GameRuntime::new(machine, NullAudio::default(), MemorySettings::default());
/// runtime.start(PlayMode::Normal);
/// runtime.run_for(Duration::from_millis(50));
/// assert!(runtime.state().anchor().row > 0 || runtime.state().completed_pieces() > 0);
/// ```
#[derive(Debug)]
pub struct GameRuntime<A, S> {
    machine: GameMachine,
    audio: A,
    settings: S,
    tx: Sender<TimerFired>,
    rx: Receiver<TimerFired>,
    pending: VecDeque<GameEvent>,
    timers: [Option<Sender<()>>; TimerId::LEN],
    generations: [u64; TimerId::LEN],
}

impl<A, S> GameRuntime<A, S>
where
    A: AudioSink,
    S: SettingsStore,
{
    #[must_use]
    pub fn new(machine: GameMachine, audio: A, settings: S) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            machine,
            audio,
            settings,
            tx,
            rx,
            pending: VecDeque::new(),
            timers: [None, None, None],
            generations: [0; TimerId::LEN],
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        self.machine.state()
    }

    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    #[must_use]
    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Reads the persisted settings and starts a new game.
    pub fn start(&mut self, mode: PlayMode) {
        let settings = StoredSettings::load_from(&self.settings);
        self.audio.set_muted(settings.muted);
        self.dispatch(GameEvent::StartGame { mode, settings });
    }

    /// Handles `event` and every event it chains, in order.
    pub fn dispatch(&mut self, event: GameEvent) {
        self.pending.push_back(event);
        while let Some(event) = self.pending.pop_front() {
            for command in self.machine.handle(event) {
                self.execute(command);
            }
        }
    }

    /// Waits up to `timeout` for one live timer event and handles it.
    ///
    /// Returns whether an event was handled.
    pub fn process_next(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Ok(fired) = self.rx.recv_timeout(remaining) else {
                return false;
            };
            if self.is_live(fired) {
                self.dispatch(fired.timer.event());
                return true;
            }
        }
    }

    /// Handles timer events until `duration` has elapsed.
    pub fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.process_next(remaining);
        }
    }

    fn is_live(&self, fired: TimerFired) -> bool {
        let index = fired.timer.index();
        self.timers[index].is_some() && self.generations[index] == fired.generation
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::StartTimer { timer, interval } => self.start_timer(timer, interval, true),
            Command::Delay { timer, duration } => self.start_timer(timer, duration, false),
            Command::CancelTimer(timer) => self.cancel_timer(timer),
            Command::Dispatch(event) => self.pending.push_back(event),
            Command::PlaySound(sound) => {
                // failures are the sink's to report
                let _ = self.audio.play(sound);
            }
            Command::StopSound => self.audio.stop(),
            Command::PersistHighScore(score) => self.settings.set_high_score(score),
            Command::PersistMuted(muted) => {
                self.settings.set_muted(muted);
                self.audio.set_muted(muted);
            }
        }
    }

    fn start_timer(&mut self, timer: TimerId, interval: Duration, repeat: bool) {
        self.cancel_timer(timer);
        let index = timer.index();
        let fired = TimerFired {
            timer,
            generation: self.generations[index],
        };
        self.timers[index] = Some(spawn_timer(self.tx.clone(), fired, interval, repeat));
    }

    fn cancel_timer(&mut self, timer: TimerId) {
        let index = timer.index();
        self.timers[index] = None;
        self.generations[index] += 1;
    }
}
