use std::ops::Range;

use crate::math::Mat3;

/// Uniform value types the program knows how to upload.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniformKind {
    F32,
    /// `mat3x3<f32>`: three columns, each padded to 16 bytes.
    Mat3,
}

impl UniformKind {
    /// Size in bytes inside a uniform block.
    #[inline]
    pub const fn size(self) -> u32 {
        match self {
            UniformKind::F32 => 4,
            UniformKind::Mat3 => 48,
        }
    }
}

/// A named member of the uniform block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    pub name: String,
    pub offset: u32,
    pub kind: UniformKind,
}

impl UniformSlot {
    #[inline]
    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.kind.size() as usize
    }
}

/// Name → location table for one uniform block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniformLayout {
    slots: Vec<UniformSlot>,
    size: u32,
}

impl UniformLayout {
    /// An empty layout whose block occupies `size` bytes.
    pub fn new(size: u32) -> Self {
        Self { slots: Vec::new(), size }
    }

    pub fn with_slot(mut self, name: impl Into<String>, offset: u32, kind: UniformKind) -> Self {
        self.slots.push(UniformSlot { name: name.into(), offset, kind });
        self
    }

    pub fn find(&self, name: &str) -> Option<&UniformSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Block size in bytes.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.size == 0
    }

    /// Combines the layouts seen by two stages sharing one block.
    ///
    /// A name present in both must sit at the same offset with the same type.
    pub fn merge(&self, other: &UniformLayout) -> Result<UniformLayout, String> {
        if self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }

        let mut merged = self.clone();
        merged.size = self.size.max(other.size);

        for slot in &other.slots {
            match merged.find(&slot.name) {
                Some(existing) if existing == slot => {}
                Some(existing) => {
                    return Err(format!(
                        "uniform `{}` declared differently across stages ({:?} at {} vs {:?} at {})",
                        slot.name, existing.kind, existing.offset, slot.kind, slot.offset
                    ));
                }
                None => merged.slots.push(slot.clone()),
            }
        }

        Ok(merged)
    }
}

/// CPU copy of a uniform block, written by name.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let bytes = vec![0; layout.size() as usize];
        Self { layout, bytes }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Writes a float; returns the byte range that changed, or `None` if the
    /// block has no float member called `name`.
    pub fn set_f32(&mut self, name: &str, value: f32) -> Option<Range<usize>> {
        self.write(name, UniformKind::F32, bytemuck::bytes_of(&value))
    }

    /// Writes a 3x3 matrix; returns the byte range that changed, or `None` if
    /// the block has no `mat3x3<f32>` member called `name`.
    pub fn set_mat3(&mut self, name: &str, value: &Mat3) -> Option<Range<usize>> {
        let padded = value.to_padded_cols();
        self.write(name, UniformKind::Mat3, bytemuck::bytes_of(&padded))
    }

    fn write(&mut self, name: &str, kind: UniformKind, data: &[u8]) -> Option<Range<usize>> {
        let slot = self.layout.find(name).filter(|s| s.kind == kind)?;
        let range = slot.range();
        self.bytes.get_mut(range.clone())?.copy_from_slice(data);
        Some(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rotate_2d;

    fn quad_layout() -> UniformLayout {
        UniformLayout::new(64)
            .with_slot("u_model", 0, UniformKind::Mat3)
            .with_slot("u_aspectRatio", 48, UniformKind::F32)
    }

    #[test]
    fn set_f32_writes_at_offset() {
        let mut block = UniformBlock::new(quad_layout());
        let range = block.set_f32("u_aspectRatio", 1.5).unwrap();
        assert_eq!(range, 48..52);
        assert_eq!(&block.bytes()[48..52], &1.5f32.to_ne_bytes());
    }

    #[test]
    fn set_mat3_writes_padded_columns() {
        let mut block = UniformBlock::new(quad_layout());
        let m = rotate_2d(90.0);
        assert_eq!(block.set_mat3("u_model", &m), Some(0..48));

        let floats: Vec<f32> = block.bytes()[..48]
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(&floats[0..3], &m.cols[0][..]);
        assert_eq!(floats[3], 0.0);
        assert_eq!(&floats[4..7], &m.cols[1][..]);
        assert_eq!(&floats[8..11], &m.cols[2][..]);
    }

    #[test]
    fn unknown_name_is_a_no_op() {
        let mut block = UniformBlock::new(quad_layout());
        assert_eq!(block.set_f32("u_time", 1.0), None);
        assert!(block.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn wrong_kind_is_a_no_op() {
        let mut block = UniformBlock::new(quad_layout());
        assert_eq!(block.set_f32("u_model", 1.0), None);
        assert_eq!(block.set_mat3("u_aspectRatio", &Mat3::IDENTITY), None);
    }

    #[test]
    fn empty_layout_accepts_nothing() {
        let mut block = UniformBlock::new(UniformLayout::default());
        assert_eq!(block.set_f32("u_aspectRatio", 1.0), None);
        assert!(block.bytes().is_empty());
    }

    #[test]
    fn merge_unions_compatible_stages() {
        let vs = UniformLayout::new(64).with_slot("u_model", 0, UniformKind::Mat3);
        let fs = UniformLayout::new(64).with_slot("u_aspectRatio", 48, UniformKind::F32);
        let merged = vs.merge(&fs).unwrap();
        assert!(merged.find("u_model").is_some());
        assert!(merged.find("u_aspectRatio").is_some());
        assert_eq!(merged.size(), 64);
    }

    #[test]
    fn merge_rejects_conflicting_declarations() {
        let vs = UniformLayout::new(64).with_slot("u_aspectRatio", 48, UniformKind::F32);
        let fs = UniformLayout::new(16).with_slot("u_aspectRatio", 0, UniformKind::F32);
        assert!(vs.merge(&fs).is_err());
    }

    #[test]
    fn merge_with_empty_keeps_other() {
        assert_eq!(UniformLayout::default().merge(&quad_layout()).unwrap(), quad_layout());
    }
}
