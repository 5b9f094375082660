#![no_main]

use codec::{decode_autosave, decode_hash, encode_autosave, encode_hash, DecodeOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let options = DecodeOptions::for_testing();

    if let Ok(root) = decode_hash(input, &options) {
        let hash = encode_hash(&root).expect("decoded state must re-encode");
        let again = decode_hash(&hash, &options).expect("re-encoded hash must decode");
        assert_eq!(again, root.quantized().expect("decoded state must quantize"));
    }

    if let Ok(root) = decode_autosave(input, &options) {
        encode_autosave(&root).expect("decoded state must re-encode");
    }
});
