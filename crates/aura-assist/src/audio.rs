//! ---
//! aura_section: "05-external-interfaces"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Generative chat and speech synthesis adapters."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use base64::{engine::general_purpose, Engine as _};
use bytes::{BufMut, Bytes, BytesMut};

use crate::errors::Result;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const HEADER_LEN: usize = 44;

/// Decode the inline base64 audio returned by the speech model.
pub fn decode_pcm(encoded: &str) -> Result<Bytes> {
    Ok(Bytes::from(general_purpose::STANDARD.decode(encoded.trim())?))
}

/// Wrap raw little-endian 16-bit mono PCM in a canonical RIFF/WAVE container.
pub fn pcm_to_wav(pcm: &[u8], sample_rate_hz: u32) -> Bytes {
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate_hz * u32::from(block_align);
    let data_len = u32::try_from(pcm.len()).unwrap_or(u32::MAX - HEADER_LEN as u32);

    let mut buf = BytesMut::with_capacity(HEADER_LEN + pcm.len());
    buf.put_slice(b"RIFF");
    buf.put_u32_le(36 + data_len);
    buf.put_slice(b"WAVE");
    buf.put_slice(b"fmt ");
    buf.put_u32_le(16);
    buf.put_u16_le(1); // PCM
    buf.put_u16_le(CHANNELS);
    buf.put_u32_le(sample_rate_hz);
    buf.put_u32_le(byte_rate);
    buf.put_u16_le(block_align);
    buf.put_u16_le(BITS_PER_SAMPLE);
    buf.put_slice(b"data");
    buf.put_u32_le(data_len);
    buf.put_slice(&pcm[..data_len as usize]);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le_u32(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    #[test]
    fn header_describes_mono_sixteen_bit() {
        let pcm = vec![0u8; 480];
        let wav = pcm_to_wav(&pcm, 24_000);
        assert_eq!(wav.len(), 44 + 480);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(le_u32(&wav, 4), 36 + 480);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(le_u32(&wav, 24), 24_000);
        assert_eq!(le_u32(&wav, 28), 48_000);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(le_u32(&wav, 40), 480);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_pcm("not base64 !!").is_err());
        assert_eq!(decode_pcm("AAEC").unwrap().as_ref(), &[0u8, 1, 2]);
    }
}
