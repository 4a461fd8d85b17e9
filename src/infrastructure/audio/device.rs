//! In-process playback on the default output device

use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::oneshot;

use super::{PlaybackError, StopSignal};

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Decode `path` and queue it on the default output device.
///
/// The output stream lives on a dedicated thread until the clip ends or
/// `stop` is requested. Resolves once the clip is queued.
pub(super) async fn start(path: PathBuf, stop: StopSignal) -> Result<(), PlaybackError> {
    let (started_tx, started_rx) = oneshot::channel();

    std::thread::spawn(move || {
        let (_stream, sink) = match open_sink(&path) {
            Ok(opened) => opened,
            Err(e) => {
                let _ = started_tx.send(Err(e));
                return;
            }
        };
        let _ = started_tx.send(Ok(()));

        while !sink.empty() {
            if stop.is_requested() {
                sink.stop();
                tracing::debug!(path = %path.display(), "Device playback stopped");
                return;
            }
            std::thread::sleep(STOP_POLL_INTERVAL);
        }
        tracing::debug!(path = %path.display(), "Device playback finished");
    });

    started_rx
        .await
        .map_err(|_| PlaybackError::Output("playback thread exited".to_string()))?
}

fn open_sink(path: &Path) -> Result<(OutputStream, Sink), PlaybackError> {
    let file = File::open(path)?;
    // Decode first so an unplayable clip fails before the device is opened
    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| PlaybackError::Decode(e.to_string()))?;

    let (stream, handle) =
        OutputStream::try_default().map_err(|e| PlaybackError::Output(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| PlaybackError::Output(e.to_string()))?;
    sink.append(source);

    Ok((stream, sink))
}
