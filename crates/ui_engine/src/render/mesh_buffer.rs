//! Shared growable vertex/index buffer
//!
//! All UI geometry for one canvas accumulates here between flushes. The
//! buffer hands out cursor positions, grows by doubling when a reservation
//! overflows, and is rewound (never shrunk) at the start of each canvas
//! walk, so steady-state frames reallocate nothing.
//!
//! Cursor and flush-marker mutation happens only inside this type:
//! assemblers reserve through `request` and the orchestrator closes batches
//! through `end_batch`, so the offset >= start invariant has a single
//! enforcement point.

use crate::config::UiSettings;

use super::device::{IndexBufferObject, VertexBufferObject};

/// Floats per vertex: position x/y/z, uv, packed color
pub const VERTEX_FLOATS: usize = 6;

/// Bytes per vertex
pub const VERTEX_BYTES: usize = VERTEX_FLOATS * 4;

/// Vertex ceiling imposed by 16-bit indices
pub const MAX_VERTEX_COUNT: usize = u16::MAX as usize + 1;

/// A contiguous index range closed by `MeshBuffer::end_batch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    /// First index of the batch
    pub start: usize,

    /// Number of indices in the batch
    pub count: usize,
}

/// Growable vertex/index arena shared by every renderable of a canvas
pub struct MeshBuffer {
    vdata: Vec<f32>,
    idata: Vec<u16>,
    vb: Box<dyn VertexBufferObject>,
    ib: Box<dyn IndexBufferObject>,

    byte_offset: usize,
    indice_offset: usize,
    vertex_offset: usize,
    byte_start: usize,
    indice_start: usize,
    vertex_start: usize,

    dirty: bool,
    max_bytes: Option<usize>,
}

impl MeshBuffer {
    /// Create a buffer with the configured initial capacity, writing to the
    /// given GPU buffer objects
    pub fn new(
        settings: &UiSettings,
        vb: Box<dyn VertexBufferObject>,
        ib: Box<dyn IndexBufferObject>,
    ) -> Self {
        Self {
            vdata: vec![0.0; settings.initial_vertex_capacity * VERTEX_FLOATS],
            idata: vec![0; settings.initial_indice_capacity],
            vb,
            ib,
            byte_offset: 0,
            indice_offset: 0,
            vertex_offset: 0,
            byte_start: 0,
            indice_start: 0,
            vertex_start: 0,
            dirty: false,
            max_bytes: settings.max_buffer_bytes,
        }
    }

    /// Reserve space for `vertex_count` vertices and `indice_count` indices
    ///
    /// Grows the arenas by doubling until the reservation fits, preserving
    /// already-written contents at their offsets. Returns `false` without
    /// reserving when the reservation would cross the 16-bit vertex ceiling
    /// or the configured byte cap; the caller then emits no geometry for
    /// this element this frame.
    pub fn request(&mut self, vertex_count: usize, indice_count: usize) -> bool {
        if self.vertex_offset + vertex_count > MAX_VERTEX_COUNT {
            log::warn!(
                "mesh buffer vertex ceiling reached ({} + {} > {}), dropping geometry",
                self.vertex_offset,
                vertex_count,
                MAX_VERTEX_COUNT
            );
            return false;
        }

        let byte_offset = self.byte_offset + vertex_count * VERTEX_BYTES;
        let indice_offset = self.indice_offset + indice_count;

        let mut byte_len = self.vdata.len() * 4;
        let mut indice_len = self.idata.len();
        if byte_offset > byte_len || indice_offset > indice_len {
            while byte_len < byte_offset || indice_len < indice_offset {
                byte_len *= 2;
                indice_len *= 2;
            }

            if let Some(cap) = self.max_bytes {
                if byte_len > cap {
                    log::warn!(
                        "mesh buffer growth to {} bytes exceeds cap of {}, dropping geometry",
                        byte_len,
                        cap
                    );
                    return false;
                }
            }

            self.vdata.resize(byte_len / 4, 0.0);
            self.idata.resize(indice_len, 0);
            log::debug!("mesh buffer grown to {} vertex bytes, {} indices", byte_len, indice_len);
        }

        self.vertex_offset += vertex_count;
        self.indice_offset = indice_offset;
        self.byte_offset = byte_offset;
        self.dirty = true;

        true
    }

    /// Close the accumulating batch and return its index range
    ///
    /// Advances all three start markers to the current cursors, so the next
    /// batch begins exactly where this one ended.
    pub fn end_batch(&mut self) -> IndexRange {
        let range = IndexRange {
            start: self.indice_start,
            count: self.indice_offset - self.indice_start,
        };

        self.byte_start = self.byte_offset;
        self.indice_start = self.indice_offset;
        self.vertex_start = self.vertex_offset;

        range
    }

    /// Indices written since the last `end_batch`
    pub fn pending_indices(&self) -> usize {
        self.indice_offset - self.indice_start
    }

    /// Push everything written this frame to the GPU buffer objects
    ///
    /// No-op when nothing was written since the last upload.
    pub fn upload(&mut self) {
        if self.byte_offset == 0 || !self.dirty {
            return;
        }

        let float_count = self.byte_offset / 4;
        self.vb.update(0, bytemuck::cast_slice(&self.vdata[..float_count]));
        self.ib.update(0, bytemuck::cast_slice(&self.idata[..self.indice_offset]));

        self.dirty = false;
    }

    /// Rewind cursors and markers for the next canvas walk
    ///
    /// Capacity is retained; the arenas only ever grow.
    pub fn reset(&mut self) {
        self.byte_offset = 0;
        self.indice_offset = 0;
        self.vertex_offset = 0;
        self.byte_start = 0;
        self.indice_start = 0;
        self.vertex_start = 0;
        self.dirty = false;
    }

    /// Write cursor into the float arena
    pub fn float_cursor(&self) -> usize {
        self.byte_offset >> 2
    }

    /// Write cursor into the index arena
    pub fn indice_cursor(&self) -> usize {
        self.indice_offset
    }

    /// Next vertex id, the base for this element's indices
    pub fn vertex_cursor(&self) -> usize {
        self.vertex_offset
    }

    /// Byte write cursor
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Mutable access to both arenas for geometry writes
    ///
    /// Taken after `request`, since growth may have reallocated them.
    pub fn arrays_mut(&mut self) -> (&mut [f32], &mut [u16]) {
        (&mut self.vdata, &mut self.idata)
    }

    /// Current vertex arena capacity in bytes
    pub fn vertex_capacity_bytes(&self) -> usize {
        self.vdata.len() * 4
    }

    /// Current index arena capacity in elements
    pub fn indice_capacity(&self) -> usize {
        self.idata.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::HeadlessBuffer;

    fn small_buffer() -> MeshBuffer {
        let settings = UiSettings {
            initial_vertex_capacity: 4,
            initial_indice_capacity: 6,
            ..Default::default()
        };
        MeshBuffer::new(
            &settings,
            Box::new(HeadlessBuffer::new()),
            Box::new(HeadlessBuffer::new()),
        )
    }

    #[test]
    fn test_request_advances_cursors() {
        let mut buffer = small_buffer();

        assert!(buffer.request(4, 6));
        assert_eq!(buffer.vertex_cursor(), 4);
        assert_eq!(buffer.indice_cursor(), 6);
        assert_eq!(buffer.byte_offset(), 4 * VERTEX_BYTES);
    }

    #[test]
    fn test_overflow_doubles_until_fit_and_preserves_bytes() {
        let mut buffer = small_buffer();

        assert!(buffer.request(4, 6));
        {
            let (vbuf, ibuf) = buffer.arrays_mut();
            for (i, value) in vbuf.iter_mut().take(4 * VERTEX_FLOATS).enumerate() {
                *value = i as f32;
            }
            for (i, value) in ibuf.iter_mut().take(6).enumerate() {
                *value = i as u16;
            }
        }

        // 16 quads needs several doublings of the 4-vertex arena.
        assert!(buffer.request(64, 96));
        assert!(buffer.vertex_capacity_bytes() >= 68 * VERTEX_BYTES);
        assert!(buffer.indice_capacity() >= 102);

        let (vbuf, ibuf) = buffer.arrays_mut();
        for (i, value) in vbuf.iter().take(4 * VERTEX_FLOATS).enumerate() {
            assert_eq!(*value, i as f32);
        }
        for (i, value) in ibuf.iter().take(6).enumerate() {
            assert_eq!(*value, i as u16);
        }
    }

    #[test]
    fn test_reset_rewinds_but_keeps_capacity() {
        let mut buffer = small_buffer();
        assert!(buffer.request(64, 96));
        let capacity = buffer.vertex_capacity_bytes();

        buffer.reset();

        assert_eq!(buffer.byte_offset(), 0);
        assert_eq!(buffer.indice_cursor(), 0);
        assert_eq!(buffer.vertex_cursor(), 0);
        assert_eq!(buffer.pending_indices(), 0);
        assert_eq!(buffer.vertex_capacity_bytes(), capacity);
    }

    #[test]
    fn test_end_batch_returns_range_and_advances_start() {
        let mut buffer = small_buffer();

        assert!(buffer.request(4, 6));
        let first = buffer.end_batch();
        assert_eq!(first, IndexRange { start: 0, count: 6 });
        assert_eq!(buffer.pending_indices(), 0);

        assert!(buffer.request(4, 6));
        let second = buffer.end_batch();
        assert_eq!(second, IndexRange { start: 6, count: 6 });
    }

    #[test]
    fn test_byte_cap_refuses_reservation() {
        let settings = UiSettings {
            initial_vertex_capacity: 4,
            initial_indice_capacity: 6,
            max_buffer_bytes: Some(4 * VERTEX_BYTES),
            ..Default::default()
        };
        let mut buffer = MeshBuffer::new(
            &settings,
            Box::new(HeadlessBuffer::new()),
            Box::new(HeadlessBuffer::new()),
        );

        assert!(buffer.request(4, 6));
        assert!(!buffer.request(4, 6));
        // Refused reservation leaves cursors untouched.
        assert_eq!(buffer.vertex_cursor(), 4);
    }

    #[test]
    fn test_upload_writes_prefix_once() {
        let vb = HeadlessBuffer::new();
        let ib = HeadlessBuffer::new();
        let settings = UiSettings::default();
        let mut buffer = MeshBuffer::new(&settings, Box::new(vb.clone()), Box::new(ib.clone()));

        assert!(buffer.request(4, 6));
        {
            let (vbuf, ibuf) = buffer.arrays_mut();
            vbuf[0] = 1.5;
            ibuf[0] = 3;
        }
        buffer.upload();

        assert_eq!(vb.contents().len(), 4 * VERTEX_BYTES);
        assert_eq!(ib.contents().len(), 6 * 2);
        assert_eq!(vb.update_count(), 1);

        // Clean buffer: second upload is a no-op.
        buffer.upload();
        assert_eq!(vb.update_count(), 1);
    }
}
