//! GPU device abstraction for the UI renderer
//!
//! The batcher only ever writes buffers; it never reads them back or
//! records commands itself. Backends implement the two buffer traits;
//! the headless implementation here captures uploads for tests and
//! server-side use.

use std::cell::RefCell;
use std::rc::Rc;

/// GPU vertex buffer object
pub trait VertexBufferObject {
    /// Replace `data.len()` bytes starting at `byte_offset`
    fn update(&mut self, byte_offset: usize, data: &[u8]);
}

/// GPU index buffer object
pub trait IndexBufferObject {
    /// Replace `data.len()` bytes starting at `byte_offset`
    fn update(&mut self, byte_offset: usize, data: &[u8]);
}

/// In-memory buffer standing in for a GPU buffer object
///
/// Clones share storage, so a test can keep a handle while the mesh buffer
/// owns the boxed trait object.
#[derive(Clone, Default)]
pub struct HeadlessBuffer {
    inner: Rc<RefCell<HeadlessInner>>,
}

#[derive(Default)]
struct HeadlessInner {
    bytes: Vec<u8>,
    update_count: usize,
}

impl HeadlessBuffer {
    /// Create an empty headless buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written by the most recent uploads
    pub fn contents(&self) -> Vec<u8> {
        self.inner.borrow().bytes.clone()
    }

    /// Number of `update` calls received
    pub fn update_count(&self) -> usize {
        self.inner.borrow().update_count
    }

    fn write(&self, byte_offset: usize, data: &[u8]) {
        let mut inner = self.inner.borrow_mut();
        let end = byte_offset + data.len();
        if inner.bytes.len() < end {
            inner.bytes.resize(end, 0);
        }
        inner.bytes[byte_offset..end].copy_from_slice(data);
        inner.update_count += 1;
    }
}

impl VertexBufferObject for HeadlessBuffer {
    fn update(&mut self, byte_offset: usize, data: &[u8]) {
        self.write(byte_offset, data);
    }
}

impl IndexBufferObject for HeadlessBuffer {
    fn update(&mut self, byte_offset: usize, data: &[u8]) {
        self.write(byte_offset, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_buffer_shares_storage_across_clones() {
        let buffer = HeadlessBuffer::new();
        let mut writer: Box<dyn VertexBufferObject> = Box::new(buffer.clone());

        writer.update(0, &[1, 2, 3]);
        writer.update(2, &[9, 9]);

        assert_eq!(buffer.contents(), vec![1, 2, 9, 9]);
        assert_eq!(buffer.update_count(), 2);
    }
}
