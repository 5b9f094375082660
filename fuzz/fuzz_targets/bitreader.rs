#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&len_byte, rest)) = data.split_first() else {
        return;
    };
    // Trim up to seven bits so the logical length is not always whole bytes.
    let bit_len = (rest.len() * 8).saturating_sub(usize::from(len_byte % 8));
    let mut reader = BitReader::with_bit_len(rest, bit_len);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < rest.len() && idx < 1024 {
        let op = rest[idx] % 5;
        idx += 1;

        let before = reader.bit_position();
        match op {
            0 => {
                let _ = reader.read_bit();
            }
            1 => {
                let bits = (rest[idx.saturating_sub(1)] % 64).saturating_add(1);
                let _ = reader.read_bits(bits);
            }
            2 => {
                let _ = reader.read_varint();
            }
            3 => {
                let _ = reader.read_svarint();
            }
            _ => {
                let _ = reader.ended();
            }
        }
        assert!(reader.bit_position() >= before);
        assert!(reader.bit_position() <= bit_len);
    }
});
