pub mod whistle;

use whistle::RefereeWhistle;

use rodio::{OutputStream, Sink};
use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

enum AudioCommand {
    PlayWhistle,
}

/// Handle to the chime playback thread.
///
/// rodio's output types are not Send, so a dedicated thread owns them and
/// commands arrive over a channel. Playback is fire-and-forget: a phase
/// completion should never stall or fail because audio is unavailable.
pub struct ChimeHandle {
    tx: Arc<Mutex<Option<Sender<AudioCommand>>>>,
}

impl ChimeHandle {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>, String> {
        if let Some(tx) = self.tx.lock().map_err(|e| e.to_string())?.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();

        thread::Builder::new()
            .name("courtside-chime".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::PlayWhistle => {
                            if let Err(err) = ensure_sink(&mut _stream, &mut sink) {
                                log::warn!("Chime unavailable: {err}");
                                continue;
                            }
                            if let Some(ref s) = sink {
                                s.append(RefereeWhistle::new());
                            }
                        }
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        let tx_clone = tx.clone();
        *self.tx.lock().map_err(|e| e.to_string())? = Some(tx);
        Ok(tx_clone)
    }

    /// Queue the referee whistle. Errors are logged and swallowed; the
    /// chime is a nicety, not a requirement.
    pub fn play_whistle(&self) {
        match self.ensure_thread() {
            Ok(tx) => {
                if let Err(err) = tx.send(AudioCommand::PlayWhistle) {
                    log::warn!("Chime thread unavailable: {err}");
                }
            }
            Err(err) => log::warn!("Failed to start chime thread: {err}"),
        }
    }
}

impl Clone for ChimeHandle {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}
