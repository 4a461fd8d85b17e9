// End-to-end tests for tts-console
//
// Each test starts an in-process axum stub of the two speech endpoints on an
// ephemeral port and drives the real HTTP repository and file-backed audio
// player against it. Audio files land in a per-test scratch directory that is
// removed on teardown.

mod test_speakers;
mod test_tts;
