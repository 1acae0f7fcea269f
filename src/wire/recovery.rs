//! Heuristics for replays written by buggy or legacy producers.

use super::format::{is_bomb_id, BOMB_ID_SHIFT, NAME_SCAN_SENTINELS};
use super::options::DecodeOptions;
use super::reader::{ByteReader, StringRecovery};
use crate::replay::{NoteEvent, NoteEventType};
use crate::util::Result;

/// Turn a note that is really a bomb into a bomb event.
///
/// Returns true when the event was changed. Cut info decoded from the wire is
/// left in place.
pub fn reclassify_bomb(note: &mut NoteEvent) -> bool {
    if !is_bomb_id(note.note_id) {
        return false;
    }
    tracing::trace!(note_id = note.note_id, "reclassifying note as bomb");
    note.note_id += BOMB_ID_SHIFT;
    note.event_type = NoteEventType::Bomb;
    true
}

/// Read the player name, tolerating producers that under-declare its length.
///
/// After the declared span, the name is extended byte by byte until the next
/// i32 is one of the platform length prefixes that always follow it. A
/// name whose bytes happen to spell one of those values ends early; that
/// matches what legacy producers expect.
pub fn read_player_name(r: &mut ByteReader<'_>, opts: &DecodeOptions) -> Result<String> {
    if !opts.legacy_name_scan {
        return r.read_string(opts.string_ceiling, opts.max_string_recoveries);
    }

    let start = r.position();
    let declared = r.read_i32()?;
    if declared < 0 || declared as usize > opts.name_ceiling {
        r.rewind(start);
        return r.read_string(opts.string_ceiling, opts.max_string_recoveries);
    }

    let declared = declared as usize;
    let mut extra = 0usize;
    if declared > 0 {
        while !NAME_SCAN_SENTINELS.contains(&r.peek_i32(declared + extra)?) {
            extra += 1;
        }
    }
    if extra > 0 {
        tracing::trace!(declared, extra, "player name extended past declared length");
    }

    let bytes = r.read_bytes(declared + extra)?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Report string recoveries from a committed record.
pub(crate) fn report_recoveries(recoveries: &[StringRecovery]) {
    for rec in recoveries {
        tracing::warn!(
            offset = rec.offset,
            declared_len = rec.declared_len,
            attempt = rec.attempt,
            "string length prefix rejected, re-read with 1-byte length"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(note_id: i32, event_type: NoteEventType) -> NoteEvent {
        NoteEvent {
            note_id,
            event_time: 1.0,
            spawn_time: 0.5,
            event_type,
            cut: None,
        }
    }

    #[test]
    fn test_reclassify_minus_one() {
        let mut n = note(-1, NoteEventType::Miss);
        assert!(reclassify_bomb(&mut n));
        assert_eq!(n.note_id, 3);
        assert_eq!(n.event_type, NoteEventType::Bomb);
    }

    #[test]
    fn test_reclassify_nine_suffix() {
        let mut n = note(30_409, NoteEventType::Good);
        assert!(reclassify_bomb(&mut n));
        assert_eq!(n.note_id, 30_413);
        assert_eq!(n.event_type, NoteEventType::Bomb);

        let mut n = note(30_400, NoteEventType::Good);
        assert!(!reclassify_bomb(&mut n));
        assert_eq!(n.note_id, 30_400);
        assert_eq!(n.event_type, NoteEventType::Good);
    }

    fn name_then_platform(declared: i32, name: &[u8], platform: &str) -> Vec<u8> {
        let mut data = declared.to_le_bytes().to_vec();
        data.extend_from_slice(name);
        data.extend_from_slice(&(platform.len() as i32).to_le_bytes());
        data.extend_from_slice(platform.as_bytes());
        data
    }

    #[test]
    fn test_name_exact_length() {
        let data = name_then_platform(6, b"player", "steam");
        let mut r = ByteReader::new(&data);
        let name = read_player_name(&mut r, &DecodeOptions::default()).unwrap();
        assert_eq!(name, "player");
        assert_eq!(r.position(), 10);
    }

    #[test]
    fn test_name_under_declared() {
        // Declares 3 bytes but writes 6; scan finds the platform prefix.
        let data = name_then_platform(3, "Zoë42".as_bytes(), "oculus");
        let mut r = ByteReader::new(&data);
        let name = read_player_name(&mut r, &DecodeOptions::default()).unwrap();
        assert_eq!(name, "Zoë42");
        assert_eq!(r.read_string(300, 16).unwrap(), "oculus");
    }

    #[test]
    fn test_name_empty_skips_scan() {
        let data = name_then_platform(0, b"", "");
        let mut r = ByteReader::new(&data);
        let name = read_player_name(&mut r, &DecodeOptions::default()).unwrap();
        assert_eq!(name, "");
        assert_eq!(r.position(), 4);
    }

    #[test]
    fn test_name_scan_runs_off_end() {
        let mut data = 2i32.to_le_bytes().to_vec();
        data.extend_from_slice(b"abcdefgh");
        let mut r = ByteReader::new(&data);
        let err = read_player_name(&mut r, &DecodeOptions::default()).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_name_scan_disabled() {
        let data = name_then_platform(3, b"abcdef", "steam");
        let mut r = ByteReader::new(&data);
        let opts = DecodeOptions::default().legacy_name_scan(false);
        assert_eq!(read_player_name(&mut r, &opts).unwrap(), "abc");
    }
}
