#![no_main]

use bitstream::BitReader;
use fieldpath::{DecoderOptions, FieldPathDecoder, MAX_DEPTH};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&flags, payload)) = data.split_first() else {
        return;
    };
    let decoder = FieldPathDecoder::new(DecoderOptions {
        max_paths: 256,
        signed_non_topo_deltas: flags & 1 == 1,
    });

    let mut reader = BitReader::new(payload);
    let mut paths = Vec::new();
    if let Ok(count) = decoder.decode_into(&mut reader, &mut paths) {
        assert_eq!(count, paths.len());
        assert!(count <= 256);
        assert!(paths.iter().all(|path| path.depth() <= MAX_DEPTH));
    }
});
