use core::iter::FusedIterator;

use crate::wbf;

/// A waveform segment.
///
/// This is the byte span between the segment's address and the next address
/// in the [`WaveformRegistry`](super::WaveformRegistry). It consists of a body
/// of step pairs and a two byte trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waveform<'data> {
    address: u32,
    data: &'data [u8],
}

impl<'data> Waveform<'data> {
    /// Create a segment from its address and bytes.
    #[inline]
    pub fn new(address: u32, data: &'data [u8]) -> Self {
        Waveform { address, data }
    }

    /// The file offset of the segment.
    #[inline]
    pub fn address(&self) -> u32 {
        self.address
    }

    /// The length of the segment in bytes, including the trailer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return true if the segment has no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All bytes of the segment.
    #[inline]
    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    /// The bytes preceding the trailer.
    ///
    /// A segment that is too short to hold a trailer is all body.
    #[inline]
    pub fn body(&self) -> &'data [u8] {
        match self.trailer_start() {
            Some(start) => &self.data[..start],
            None => self.data,
        }
    }

    /// The two trailing bytes of the segment, if it is long enough to have them.
    ///
    /// The first byte is normally `0xff`. These bytes are not decoded.
    #[inline]
    pub fn trailer(&self) -> Option<[u8; 2]> {
        match *self.data.get(self.trailer_start()?..)? {
            [a, b] => Some([a, b]),
            _ => None,
        }
    }

    fn trailer_start(&self) -> Option<usize> {
        self.data.len().checked_sub(wbf::WAVEFORM_TRAILER_SIZE)
    }

    /// Iterate over the steps in the body.
    ///
    /// Each call returns a new iterator starting at the first step.
    #[inline]
    pub fn steps(&self) -> WaveformStepIterator<'data> {
        WaveformStepIterator { data: self.body() }
    }

    /// The number of steps in the body.
    pub fn step_count(&self) -> usize {
        self.steps().count()
    }

    /// The total number of frames, which is the sum of the step repeat counts.
    pub fn frame_count(&self) -> usize {
        self.steps().map(|step| usize::from(step.repeat)).sum()
    }
}

/// A decoded step of a waveform segment.
///
/// A step drives four pixel states for a number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaveformStep {
    /// The four 2-bit states, in the order they are packed from the most
    /// significant bits down.
    pub states: [u8; 4],
    /// The number of frames the states are held for, from 1 to 256.
    pub repeat: u16,
}

impl WaveformStep {
    /// Decode a step from its packed state byte and its stored count.
    #[inline]
    pub fn from_bytes(packed: u8, count: u8) -> Self {
        WaveformStep {
            states: [
                (packed >> 6) & 0x3,
                (packed >> 4) & 0x3,
                (packed >> 2) & 0x3,
                packed & 0x3,
            ],
            repeat: u16::from(count) + 1,
        }
    }
}

/// An iterator over the steps of a [`Waveform`].
///
/// Pairs starting with [`wbf::WAVEFORM_SKIP_MARKER`] are skipped.
#[derive(Debug, Clone)]
pub struct WaveformStepIterator<'data> {
    data: &'data [u8],
}

impl<'data> WaveformStepIterator<'data> {
    /// The bytes that have not been decoded yet.
    ///
    /// Once the iterator is exhausted, this is the odd byte at the end of the
    /// body, if there is one.
    #[inline]
    pub fn remainder(&self) -> &'data [u8] {
        self.data
    }
}

impl<'data> Iterator for WaveformStepIterator<'data> {
    type Item = WaveformStep;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let data = self.data;
            match *data {
                [wbf::WAVEFORM_SKIP_MARKER, _, ref rest @ ..] => {
                    self.data = rest;
                }
                [packed, count, ref rest @ ..] => {
                    self.data = rest;
                    return Some(WaveformStep::from_bytes(packed, count));
                }
                _ => return None,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.data.len() / 2))
    }
}

impl<'data> FusedIterator for WaveformStepIterator<'data> {}
