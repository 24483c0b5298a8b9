use rand::RngCore;

/// Replays a fixed list of uniform draws so selection outcomes can be pinned.
///
/// `rng.random::<f64>()` on this source returns the scripted values in order
/// (exactly, for dyadic fractions), cycling when the list runs out.
pub(crate) struct ScriptedRng {
    values: Vec<f64>,
    position: usize,
}

impl ScriptedRng {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty());
        ScriptedRng {
            values,
            position: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        // rand builds an f64 from the top 53 bits
        ((value * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
