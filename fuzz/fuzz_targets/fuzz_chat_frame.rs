#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The decoder must drop anything malformed without panicking; valid
    // UTF-8 is the only input a real transport can deliver.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = chatroom_client::ChatFrame::decode(s);
    }
});
