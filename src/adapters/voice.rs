//! Speech recognizer adapter.
//!
//! The detection pipeline (microphone capture, wake-word and phrase
//! matching) runs in a vendor task; this adapter owns what the pipeline
//! does not — the command grammar, the wake-word/command mode switching,
//! and turning recognized phrases into [`Command`]s for the queue in
//! [`crate::events`].
//!
//! The pipeline delivers `(event, command_id, phrase_id)` triples through
//! [`sr_event_bridge`] and polls [`recognizer_mode`] between audio frames.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: grammar registered with the esp-sr
//!   multinet engine at boot; detection itself runs in the vendor
//!   component's task, which calls [`sr_event_bridge`].
//! - **all other targets**: simulation stubs; the event handling itself
//!   is pure and tested on the host.

use log::{info, warn};

use crate::app::commands::Command;

// ───────────────────────────────────────────────────────────────
// Command grammar
// ───────────────────────────────────────────────────────────────

/// One grammar entry: the spoken phrase and its multinet phoneme string.
#[derive(Debug, Clone, Copy)]
pub struct VoicePhrase {
    pub command_id: u8,
    pub phrase: &'static str,
    pub phonetic: &'static str,
}

/// Phrases registered with the recognizer. Several phrasings share a
/// command id; ids resolve to transitions via [`Command::from_voice_id`].
pub const COMMAND_GRAMMAR: [VoicePhrase; 7] = [
    VoicePhrase { command_id: 0, phrase: "Turn on the light", phonetic: "TkN nN jc LiT" },
    VoicePhrase { command_id: 0, phrase: "Switch on the light", phonetic: "SWgp nN jc LiT" },
    VoicePhrase { command_id: 1, phrase: "Turn off the light", phonetic: "TkN eF jc LiT" },
    VoicePhrase { command_id: 1, phrase: "Switch off the light", phonetic: "SWgp eF jc LiT" },
    VoicePhrase { command_id: 1, phrase: "Go dark", phonetic: "Gb DnRK" },
    VoicePhrase { command_id: 2, phrase: "Start fan", phonetic: "STnRT FaN" },
    VoicePhrase { command_id: 3, phrase: "Stop fan", phonetic: "STnP FaN" },
];

// ───────────────────────────────────────────────────────────────
// Recognizer events and modes
// ───────────────────────────────────────────────────────────────

/// What the recognizer is listening for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerMode {
    WakeWord,
    Command,
}

/// Events delivered by the recognizer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrEvent {
    WakeWord,
    WakeWordChannelVerified(i32),
    Timeout,
    Command { command_id: i32, phrase_id: i32 },
    Unknown(i32),
}

// Raw event codes on the recognizer task's wire.
const SR_EVENT_WAKEWORD: i32 = 0;
const SR_EVENT_WAKEWORD_CHANNEL: i32 = 1;
const SR_EVENT_TIMEOUT: i32 = 2;
const SR_EVENT_COMMAND: i32 = 3;

impl SrEvent {
    /// Decode the raw triple the recognizer task delivers.
    pub fn from_raw(event: i32, command_id: i32, phrase_id: i32) -> Self {
        match event {
            SR_EVENT_WAKEWORD => Self::WakeWord,
            SR_EVENT_WAKEWORD_CHANNEL => Self::WakeWordChannelVerified(command_id),
            SR_EVENT_TIMEOUT => Self::Timeout,
            SR_EVENT_COMMAND => Self::Command {
                command_id,
                phrase_id,
            },
            other => Self::Unknown(other),
        }
    }
}

/// Mode-switch surface of the vendor engine. The event handler drives it;
/// tests substitute a recorder.
pub trait RecognizerEngine {
    fn set_mode(&mut self, mode: RecognizerMode);
}

// ───────────────────────────────────────────────────────────────
// Event handling
// ───────────────────────────────────────────────────────────────

/// React to one recognizer event. Returns the command to dispatch, if the
/// event carried a known one.
///
/// Mode policy: a verified wake word opens the command window; a timeout
/// closes it; a detected command keeps it open so follow-up commands need
/// no fresh wake word.
pub fn on_sr_event(event: SrEvent, engine: &mut impl RecognizerEngine) -> Option<Command> {
    match event {
        SrEvent::WakeWord => {
            info!("SR: wake word detected");
            None
        }
        SrEvent::WakeWordChannelVerified(channel) => {
            info!("SR: wake word channel {} verified, listening", channel);
            engine.set_mode(RecognizerMode::Command);
            None
        }
        SrEvent::Timeout => {
            info!("SR: command window timed out, back to wake word");
            engine.set_mode(RecognizerMode::WakeWord);
            None
        }
        SrEvent::Command {
            command_id,
            phrase_id,
        } => {
            let phrase = usize::try_from(phrase_id)
                .ok()
                .and_then(|i| COMMAND_GRAMMAR.get(i))
                .map_or("?", |p| p.phrase);
            info!("SR: command {} detected ('{}')", command_id, phrase);
            engine.set_mode(RecognizerMode::Command);
            let command = Command::from_voice_id(command_id);
            if command.is_none() {
                warn!("SR: unknown command id {}", command_id);
            }
            command
        }
        SrEvent::Unknown(code) => {
            warn!("SR: unknown event {}", code);
            None
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF engine binding
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU8, Ordering};

// Polled by the detect task between audio frames; written back from
// sr_event_bridge running on that same task. 0 = wake word, 1 = command.
#[cfg(target_os = "espidf")]
static SR_MODE: AtomicU8 = AtomicU8::new(0);

#[cfg(target_os = "espidf")]
pub struct EspSrEngine;

#[cfg(target_os = "espidf")]
impl RecognizerEngine for EspSrEngine {
    fn set_mode(&mut self, mode: RecognizerMode) {
        let raw = match mode {
            RecognizerMode::WakeWord => 0,
            RecognizerMode::Command => 1,
        };
        SR_MODE.store(raw, Ordering::Relaxed);
    }
}

/// Current listening mode. The vendor detect task polls this between
/// audio frames to choose which engine runs.
#[cfg(target_os = "espidf")]
pub fn recognizer_mode() -> RecognizerMode {
    if SR_MODE.load(Ordering::Relaxed) == 1 {
        RecognizerMode::Command
    } else {
        RecognizerMode::WakeWord
    }
}

/// Event callback for the vendor speech pipeline.
///
/// The esp-sr component's detect task owns the microphone feed (AFE
/// capture, wakenet/multinet inference) and calls this from its own
/// context for every event the engines raise; between frames it polls
/// [`recognizer_mode`] to pick the engine. Wiring the callback into that
/// task is part of the component configuration; nothing on the
/// application side invokes it.
///
/// Decodes the event, drives the engine mode, and queues any command
/// for the main loop.
#[cfg(target_os = "espidf")]
pub extern "C" fn sr_event_bridge(event: i32, command_id: i32, phrase_id: i32) {
    let mut engine = EspSrEngine;
    if let Some(command) = on_sr_event(SrEvent::from_raw(event, command_id, phrase_id), &mut engine)
    {
        if !crate::events::push_command(command) {
            warn!("SR: command queue full, dropping '{}'", command.token());
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Recognizer start
// ───────────────────────────────────────────────────────────────

/// Load the multinet model and register the command grammar.
/// Fail-soft: on any error the recognizer stays down and the tower runs
/// without voice control.
#[cfg(target_os = "espidf")]
pub fn start_recognizer() -> bool {
    use esp_idf_svc::sys::sr::*;
    use log::error;

    unsafe {
        let models = esp_srmodel_init(c"model".as_ptr() as _);
        if models.is_null() {
            error!("SR: no models in the model partition");
            return false;
        }

        let mn_name = esp_srmodel_filter(models, c"mn".as_ptr() as _, core::ptr::null_mut());
        if mn_name.is_null() {
            error!("SR: no multinet model found");
            return false;
        }

        let multinet = esp_mn_handle_from_name(mn_name);
        if multinet.is_null() {
            error!("SR: multinet handle lookup failed");
            return false;
        }

        let Some(create) = (*multinet).create else {
            error!("SR: multinet iface has no create entry");
            return false;
        };
        // 6000 ms command window before the engine raises a timeout event.
        let mn_data = create(mn_name as _, 6000);
        if mn_data.is_null() {
            error!("SR: multinet model create failed");
            return false;
        }

        esp_mn_commands_alloc(multinet, mn_data);
        esp_mn_commands_clear();
        for entry in &COMMAND_GRAMMAR {
            // The command table keeps its own copy; a stack buffer with a
            // NUL terminator is enough here.
            let mut phonetic = [0u8; 64];
            let len = entry.phonetic.len().min(63);
            phonetic[..len].copy_from_slice(&entry.phonetic.as_bytes()[..len]);
            esp_mn_commands_add(i32::from(entry.command_id), phonetic.as_ptr() as _);
        }
        let err = esp_mn_commands_update();
        if !err.is_null() {
            warn!("SR: {} phrases rejected by the model", (*err).num);
        }
    }

    info!("SR: recognizer up ({} phrases)", COMMAND_GRAMMAR.len());
    true
}

#[cfg(not(target_os = "espidf"))]
pub fn start_recognizer() -> bool {
    info!("SR(sim): recognizer up ({} phrases)", COMMAND_GRAMMAR.len());
    true
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
