use std::io::Cursor;

/// Decode and play a fetched audio cue, blocking until it finishes.
/// Cries ship loud; they are played at reduced volume.
pub fn play_cue(bytes: Vec<u8>) -> Result<(), String> {
    let cursor = Cursor::new(bytes);
    let (_stream, handle) = rodio::OutputStream::try_default().map_err(|err| err.to_string())?;
    let sink = rodio::Sink::try_new(&handle).map_err(|err| err.to_string())?;
    let source = rodio::Decoder::new(cursor).map_err(|err| err.to_string())?;
    sink.set_volume(0.3);
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
