use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use rdev::{listen, Button, EventType, Key};

use crate::global_constants::{INTERRUPT_EXIT_CODE, LOG_TAG_KEYBOARD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalInputEvent {
    PickRequested,
    CancelPressed,
    StopRequested,
}

/// Process-wide input hook. The rdev listener and the interrupt watcher both feed
/// one channel that the menu, the picker and the run loop read from.
pub struct GlobalInputListener {
    event_receiver: Mutex<Receiver<GlobalInputEvent>>,
    run_active: Arc<AtomicBool>,
}

impl GlobalInputListener {
    pub fn start() -> Self {
        log::debug!("{} initializing global input listener", LOG_TAG_KEYBOARD);

        let (event_sender, event_receiver) = mpsc::channel();
        let run_active = Arc::new(AtomicBool::new(false));

        Self::spawn_input_hook_thread(event_sender.clone());
        Self::spawn_interrupt_watcher_thread(event_sender, Arc::clone(&run_active));

        Self {
            event_receiver: Mutex::new(event_receiver),
            run_active,
        }
    }

    /// While a run is active, SIGINT becomes a stop request instead of ending the process.
    pub fn set_run_active(&self, is_active: bool) {
        self.run_active.store(is_active, Ordering::SeqCst);
    }

    /// Discards events that arrived while nobody was waiting.
    pub fn drain_pending(&self) {
        if let Ok(receiver) = self.event_receiver.lock() {
            let discarded = receiver.try_iter().count();
            if discarded > 0 {
                log::trace!("{} discarded {} stale event(s)", LOG_TAG_KEYBOARD, discarded);
            }
        }
    }

    /// Blocks until the next event. `None` once every producer has shut down.
    pub fn wait_for_event(&self) -> Option<GlobalInputEvent> {
        let receiver = self.event_receiver.lock().ok()?;
        receiver.recv().ok()
    }

    /// Blocks until Ctrl+C, Escape or SIGINT.
    pub fn wait_for_stop_request(&self) {
        loop {
            match self.wait_for_event() {
                Some(GlobalInputEvent::StopRequested) | Some(GlobalInputEvent::CancelPressed) => {
                    return
                }
                Some(GlobalInputEvent::PickRequested) => continue,
                None => {
                    log::error!(
                        "{} input channel closed while waiting for stop",
                        LOG_TAG_KEYBOARD
                    );
                    return;
                }
            }
        }
    }

    fn spawn_input_hook_thread(event_sender: Sender<GlobalInputEvent>) {
        std::thread::spawn(move || {
            log::info!("{} Starting global input listener thread", LOG_TAG_KEYBOARD);

            let mut state = KeyboardState::default();
            if let Err(e) = listen(move |event| {
                if let Some(global_event) = state.process_event_type(event.event_type) {
                    let _ = event_sender.send(global_event);
                }
            }) {
                log::error!(
                    "{} Failed to start input listener: {:?}. Picking points and Escape will not work; use Ctrl+C in the terminal to stop runs.",
                    LOG_TAG_KEYBOARD,
                    e
                );
            }
        });
    }

    /// Single-threaded runtime with the signal driver enabled.
    fn build_interrupt_runtime() -> std::io::Result<tokio::runtime::Runtime> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
    }

    fn spawn_interrupt_watcher_thread(
        event_sender: Sender<GlobalInputEvent>,
        run_active: Arc<AtomicBool>,
    ) {
        std::thread::spawn(move || {
            let runtime = match Self::build_interrupt_runtime() {
                Ok(runtime) => runtime,
                Err(e) => {
                    log::error!(
                        "{} Failed to build interrupt runtime: {}",
                        LOG_TAG_KEYBOARD,
                        e
                    );
                    return;
                }
            };

            runtime.block_on(async move {
                loop {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        log::error!("{} Failed to watch for SIGINT: {}", LOG_TAG_KEYBOARD, e);
                        return;
                    }

                    if !run_active.load(Ordering::SeqCst) {
                        log::info!("{} interrupt received outside a run, exiting", LOG_TAG_KEYBOARD);
                        std::process::exit(INTERRUPT_EXIT_CODE);
                    }

                    log::info!("{} interrupt received, stopping run", LOG_TAG_KEYBOARD);
                    if event_sender.send(GlobalInputEvent::StopRequested).is_err() {
                        return;
                    }
                }
            });
        });
    }
}

#[derive(Default)]
struct KeyboardState {
    is_control_pressed: bool,
}

impl KeyboardState {
    fn process_event_type(&mut self, event_type: EventType) -> Option<GlobalInputEvent> {
        match event_type {
            EventType::KeyPress(key) => self.handle_key_press(key),
            EventType::KeyRelease(key) => self.handle_key_release(key),
            EventType::ButtonPress(Button::Right) => {
                log::debug!("{} right button pressed", LOG_TAG_KEYBOARD);
                Some(GlobalInputEvent::PickRequested)
            }
            _ => None,
        }
    }

    fn handle_key_press(&mut self, key: Key) -> Option<GlobalInputEvent> {
        match key {
            Key::ControlLeft | Key::ControlRight => {
                self.is_control_pressed = true;
                None
            }
            Key::KeyC if self.is_control_pressed => {
                log::info!("{} Ctrl+C detected", LOG_TAG_KEYBOARD);
                Some(GlobalInputEvent::StopRequested)
            }
            Key::Escape => {
                log::debug!("{} escape pressed", LOG_TAG_KEYBOARD);
                Some(GlobalInputEvent::CancelPressed)
            }
            _ => None,
        }
    }

    fn handle_key_release(&mut self, key: Key) -> Option<GlobalInputEvent> {
        if matches!(key, Key::ControlLeft | Key::ControlRight) {
            self.is_control_pressed = false;
        }
        None
    }
}
