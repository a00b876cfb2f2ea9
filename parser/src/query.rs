use crate::error::LookupError;

/// Size of the value buffer handed to the lookup, terminator included.
pub const SCRATCH_LEN: usize = 32;

/// Finds `key` in a raw `k=v&k=v` query string.
///
/// Keys compare case-insensitively and values are returned as they appear on
/// the wire, without percent-decoding. A segment with no `=` is not skipped on
/// its own: the scan runs on to the next `=`, so `flag&cmd=v` never finds
/// `cmd`. A value of `SCRATCH_LEN` bytes or more is reported as truncated.
pub fn find_value<'q>(query: &'q str, key: &str) -> Result<&'q str, LookupError> {
    let mut rest = query;
    while !rest.is_empty() {
        let eq = match rest.find('=') {
            Some(i) => i,
            None => break,
        };
        let name = &rest[..eq];
        let after = &rest[eq + 1..];
        if name.len() != key.len() || !name.eq_ignore_ascii_case(key) {
            match after.find('&') {
                Some(amp) => {
                    rest = &after[amp + 1..];
                    continue;
                }
                None => break,
            }
        }
        let value = match after.find('&') {
            Some(amp) => &after[..amp],
            None => after,
        };
        if value.len() + 1 > SCRATCH_LEN {
            return Err(LookupError::Truncated);
        }
        return Ok(value);
    }
    Err(LookupError::NotFound)
}
