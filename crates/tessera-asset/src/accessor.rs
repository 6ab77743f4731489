//! Decoding accessor bytes into typed arrays.
//!
//! Supported layouts:
//!
//! | component type        | shapes                          | output            |
//! |-----------------------|---------------------------------|-------------------|
//! | FLOAT                 | SCALAR, VEC2, VEC3, VEC4, MAT4  | `f32`, glam types |
//! | UNSIGNED_BYTE         | SCALAR                          | `u8`              |
//! | UNSIGNED_SHORT        | SCALAR                          | `u16`             |
//! | UNSIGNED_INT          | SCALAR                          | `u32`             |
//! | UNSIGNED_BYTE / SHORT | VEC2, VEC4 (and VEC3 for SHORT) | glam types        |
//!
//! Integer components widened to floats are divided by the type maximum
//! when the accessor is `normalized`. Everything else is refused with
//! [`AssetError::UnsupportedLayout`].

use std::fmt;

use glam::{Mat4, Vec2, Vec3, Vec4};
use tessera_document::{Accessor, AttributeType, ComponentType};

use crate::error::{AssetError, Result};

/// A decoded accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessorData {
    F32(Vec<f32>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    Vec2(Vec<Vec2>),
    Vec3(Vec<Vec3>),
    Vec4(Vec<Vec4>),
    Mat4(Vec<Mat4>),
}

impl AccessorData {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::Vec2(v) => v.len(),
            Self::Vec3(v) => v.len(),
            Self::Vec4(v) => v.len(),
            Self::Mat4(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer scalars widened to `u32`, as used for index buffers.
    pub fn into_indices(self) -> Option<Vec<u32>> {
        match self {
            Self::U8(v) => Some(v.into_iter().map(u32::from).collect()),
            Self::U16(v) => Some(v.into_iter().map(u32::from).collect()),
            Self::U32(v) => Some(v),
            _ => None,
        }
    }
}

/// A stored value outside the accessor's declared `min`/`max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsViolation {
    pub element: usize,
    pub component: usize,
    /// The raw stored value, before normalization.
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl fmt::Display for BoundsViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "element {} component {}: {} outside [{}, {}]",
            self.element,
            self.component,
            self.value,
            self.min.map_or("-inf".to_string(), |v| v.to_string()),
            self.max.map_or("inf".to_string(), |v| v.to_string()),
        )
    }
}

/// Decoded values plus the bounds violations found while reading them.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub data: AccessorData,
    pub diagnostics: Vec<BoundsViolation>,
}

/// Reads accessor elements out of raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorCodec {
    /// Compare every component against the accessor's `min`/`max`.
    pub check_bounds: bool,
}

impl Default for AccessorCodec {
    fn default() -> Self {
        Self { check_bounds: true }
    }
}

impl AccessorCodec {
    /// Skip the `min`/`max` pass.
    pub fn without_bounds_check() -> Self {
        Self { check_bounds: false }
    }

    /// Decode `accessor.count` elements from `bytes`.
    ///
    /// `bytes` starts at the accessor's first element. Elements are read
    /// `byte_stride` apart, or packed when the buffer view declares no
    /// stride. Bounds violations never fail the decode.
    pub fn decode(
        &self,
        accessor: &Accessor,
        bytes: &[u8],
        byte_stride: Option<usize>,
    ) -> Result<Decoded> {
        let shape = Shape::of(accessor)?;
        let element_size = accessor.element_size();
        let stride = element_stride(element_size, byte_stride)?;
        match span(accessor.count, element_size, stride) {
            Some(end) if end <= bytes.len() => {}
            end => {
                return Err(AssetError::Range {
                    what: "accessor",
                    start: 0,
                    end: end.unwrap_or(usize::MAX),
                    len: bytes.len(),
                })
            }
        }

        let element = |i: usize| &bytes[i * stride..i * stride + element_size];
        let elements = (0..accessor.count).map(element);
        let ct = accessor.component_type;
        let norm = accessor.normalized;
        let data = match shape {
            Shape::F32 => AccessorData::F32(elements.map(|e| float(e, 0, ct, norm)).collect()),
            Shape::U8 => AccessorData::U8(elements.map(|e| e[0]).collect()),
            Shape::U16 => AccessorData::U16(elements.map(|e| u16_at(e, 0)).collect()),
            Shape::U32 => AccessorData::U32(elements.map(|e| u32_at(e, 0)).collect()),
            Shape::Vec2 => AccessorData::Vec2(
                elements
                    .map(|e| Vec2::new(float(e, 0, ct, norm), float(e, 1, ct, norm)))
                    .collect(),
            ),
            Shape::Vec3 => AccessorData::Vec3(
                elements
                    .map(|e| {
                        Vec3::new(float(e, 0, ct, norm), float(e, 1, ct, norm), float(e, 2, ct, norm))
                    })
                    .collect(),
            ),
            Shape::Vec4 => AccessorData::Vec4(
                elements
                    .map(|e| Vec4::from_array(std::array::from_fn(|c| float(e, c, ct, norm))))
                    .collect(),
            ),
            Shape::Mat4 => AccessorData::Mat4(
                elements
                    .map(|e| Mat4::from_cols_array(&std::array::from_fn(|c| float(e, c, ct, norm))))
                    .collect(),
            ),
        };

        let diagnostics = if self.check_bounds {
            bounds_violations(accessor, (0..accessor.count).map(element))
        } else {
            Vec::new()
        };
        if let Some(first) = diagnostics.first() {
            tracing::warn!(
                accessor = accessor.name.as_deref().unwrap_or("<unnamed>"),
                violations = diagnostics.len(),
                first = %first,
                "accessor values outside declared bounds"
            );
        }

        Ok(Decoded { data, diagnostics })
    }
}

/// Decode with bounds checking enabled.
pub fn decode(accessor: &Accessor, bytes: &[u8], byte_stride: Option<usize>) -> Result<Decoded> {
    AccessorCodec::default().decode(accessor, bytes, byte_stride)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    F32,
    U8,
    U16,
    U32,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl Shape {
    fn of(accessor: &Accessor) -> Result<Self> {
        use AttributeType as A;
        use ComponentType as C;

        match (accessor.component_type, accessor.attribute_type) {
            (C::Float, A::Scalar) => Ok(Self::F32),
            (C::UnsignedByte, A::Scalar) => Ok(Self::U8),
            (C::UnsignedShort, A::Scalar) => Ok(Self::U16),
            (C::UnsignedInt, A::Scalar) => Ok(Self::U32),
            (C::Float | C::UnsignedByte | C::UnsignedShort, A::Vec2) => Ok(Self::Vec2),
            (C::Float | C::UnsignedShort, A::Vec3) => Ok(Self::Vec3),
            (C::Float | C::UnsignedByte | C::UnsignedShort, A::Vec4) => Ok(Self::Vec4),
            (C::Float, A::Mat4) => Ok(Self::Mat4),
            (component_type, attribute_type) => Err(AssetError::UnsupportedLayout {
                component_type,
                attribute_type,
            }),
        }
    }
}

/// Distance between element starts.
pub(crate) fn element_stride(element_size: usize, byte_stride: Option<usize>) -> Result<usize> {
    match byte_stride {
        Some(stride) if stride < element_size => {
            Err(AssetError::InvalidStride { stride, element_size })
        }
        Some(stride) => Ok(stride),
        None => Ok(element_size),
    }
}

/// Bytes covered by `count` elements: the last one need not be padded out
/// to a full stride. `None` on overflow.
pub(crate) fn span(count: usize, element_size: usize, stride: usize) -> Option<usize> {
    match count {
        0 => Some(0),
        n => (n - 1).checked_mul(stride)?.checked_add(element_size),
    }
}

fn bounds_violations<'b>(
    accessor: &Accessor,
    elements: impl Iterator<Item = &'b [u8]>,
) -> Vec<BoundsViolation> {
    let min = accessor.min.as_deref().unwrap_or(&[]);
    let max = accessor.max.as_deref().unwrap_or(&[]);
    if min.is_empty() && max.is_empty() {
        return Vec::new();
    }

    let ct = accessor.component_type;
    // Float bounds are written out from f32 values.
    let round = |bound: f64| if ct == ComponentType::Float { bound as f32 as f64 } else { bound };
    let components = accessor.attribute_type.component_count();

    let mut out = Vec::new();
    for (element, bytes) in elements.enumerate() {
        for component in 0..components {
            let value = raw(bytes, component, ct);
            let lo = min.get(component).copied().map(round);
            let hi = max.get(component).copied().map(round);
            if lo.is_some_and(|lo| value < lo) || hi.is_some_and(|hi| value > hi) {
                out.push(BoundsViolation { element, component, value, min: lo, max: hi });
            }
        }
    }
    out
}

fn u16_at(e: &[u8], i: usize) -> u16 {
    u16::from_le_bytes([e[2 * i], e[2 * i + 1]])
}

fn u32_at(e: &[u8], i: usize) -> u32 {
    let o = 4 * i;
    u32::from_le_bytes([e[o], e[o + 1], e[o + 2], e[o + 3]])
}

fn f32_at(e: &[u8], i: usize) -> f32 {
    f32::from_bits(u32_at(e, i))
}

/// Component `i` as stored.
fn raw(e: &[u8], i: usize, ct: ComponentType) -> f64 {
    match ct {
        ComponentType::Byte => f64::from(e[i] as i8),
        ComponentType::UnsignedByte => f64::from(e[i]),
        ComponentType::Short => f64::from(u16_at(e, i) as i16),
        ComponentType::UnsignedShort => f64::from(u16_at(e, i)),
        ComponentType::UnsignedInt => f64::from(u32_at(e, i)),
        ComponentType::Float => f64::from(f32_at(e, i)),
    }
}

/// Component `i` as a float, normalized if asked.
fn float(e: &[u8], i: usize, ct: ComponentType, normalized: bool) -> f32 {
    let (value, max) = match ct {
        ComponentType::Float => return f32_at(e, i),
        ComponentType::Byte => (f32::from(e[i] as i8), 127.0),
        ComponentType::UnsignedByte => (f32::from(e[i]), 255.0),
        ComponentType::Short => (f32::from(u16_at(e, i) as i16), 32767.0),
        ComponentType::UnsignedShort => (f32::from(u16_at(e, i)), 65535.0),
        ComponentType::UnsignedInt => (u32_at(e, i) as f32, u32::MAX as f32),
    };
    if normalized {
        (value / max).max(-1.0)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accessor(component_type: ComponentType, attribute_type: AttributeType, count: usize) -> Accessor {
        Accessor {
            buffer_view: None,
            byte_offset: 0,
            component_type,
            normalized: false,
            count,
            attribute_type,
            max: None,
            min: None,
            sparse: None,
            name: None,
        }
    }

    fn floats(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_float_vec3_is_byte_exact() {
        let bytes = floats(&[1.0, -2.5, 3.25, 0.1, 1.0e-7, f32::MAX]);
        let acc = accessor(ComponentType::Float, AttributeType::Vec3, 2);

        let decoded = decode(&acc, &bytes, Some(12)).unwrap();
        let AccessorData::Vec3(values) = decoded.data else {
            panic!("expected Vec3 data");
        };
        assert_eq!(values.len(), 2);

        let reencoded: Vec<u8> = values
            .iter()
            .flat_map(|v| v.to_array())
            .flat_map(f32::to_le_bytes)
            .collect();
        assert_eq!(reencoded, bytes);
    }

    #[test]
    fn test_strided_read_skips_padding() {
        // Two VEC2 elements, 12 bytes apart, with 4 bytes of junk between.
        let mut bytes = floats(&[1.0, 2.0]);
        bytes.extend_from_slice(&[0xFF; 4]);
        bytes.extend(floats(&[3.0, 4.0]));
        let acc = accessor(ComponentType::Float, AttributeType::Vec2, 2);

        let decoded = decode(&acc, &bytes, Some(12)).unwrap();
        assert_eq!(
            decoded.data,
            AccessorData::Vec2(vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)])
        );
    }

    #[test]
    fn test_last_element_needs_no_trailing_stride() {
        let bytes = floats(&[1.0, 0.0, 2.0]);
        let acc = accessor(ComponentType::Float, AttributeType::Scalar, 2);
        let decoded = decode(&acc, &bytes, Some(8)).unwrap();
        assert_eq!(decoded.data, AccessorData::F32(vec![1.0, 2.0]));
    }

    #[test]
    fn test_unsigned_short_vec3_widened() {
        let bytes: Vec<u8> = [1u16, 2, 65535].iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut acc = accessor(ComponentType::UnsignedShort, AttributeType::Vec3, 1);

        let decoded = decode(&acc, &bytes, None).unwrap();
        assert_eq!(decoded.data, AccessorData::Vec3(vec![Vec3::new(1.0, 2.0, 65535.0)]));

        acc.normalized = true;
        let decoded = decode(&acc, &bytes, None).unwrap();
        let AccessorData::Vec3(values) = decoded.data else {
            panic!("expected Vec3 data");
        };
        assert_eq!(values[0].z, 1.0);
    }

    #[test]
    fn test_normalized_colors() {
        let mut acc = accessor(ComponentType::UnsignedByte, AttributeType::Vec4, 1);
        acc.normalized = true;
        let decoded = decode(&acc, &[0, 255, 51, 255], None).unwrap();
        assert_eq!(decoded.data, AccessorData::Vec4(vec![Vec4::new(0.0, 1.0, 0.2, 1.0)]));
    }

    #[test]
    fn test_float_vec4_is_byte_exact() {
        let bytes = floats(&[0.0, -1.0, 0.5, 1.0, 3.5, -0.125, 1.0e-3, f32::MIN_POSITIVE]);
        let acc = accessor(ComponentType::Float, AttributeType::Vec4, 2);

        let decoded = decode(&acc, &bytes, None).unwrap();
        let AccessorData::Vec4(values) = decoded.data else {
            panic!("expected Vec4 data");
        };
        assert_eq!(values[1], Vec4::new(3.5, -0.125, 1.0e-3, f32::MIN_POSITIVE));

        let reencoded: Vec<u8> = values
            .iter()
            .flat_map(|v| v.to_array())
            .flat_map(f32::to_le_bytes)
            .collect();
        assert_eq!(reencoded, bytes);
    }

    #[test]
    fn test_unsigned_byte_texcoords() {
        let bytes = [0, 255, 51, 102];
        let mut acc = accessor(ComponentType::UnsignedByte, AttributeType::Vec2, 2);

        let decoded = decode(&acc, &bytes, None).unwrap();
        assert_eq!(
            decoded.data,
            AccessorData::Vec2(vec![Vec2::new(0.0, 255.0), Vec2::new(51.0, 102.0)])
        );

        acc.normalized = true;
        let decoded = decode(&acc, &bytes, None).unwrap();
        assert_eq!(
            decoded.data,
            AccessorData::Vec2(vec![Vec2::new(0.0, 1.0), Vec2::new(0.2, 0.4)])
        );
    }

    #[test]
    fn test_unsigned_short_texcoords() {
        let bytes: Vec<u8> = [0u16, 65535, 13107, 300].iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut acc = accessor(ComponentType::UnsignedShort, AttributeType::Vec2, 2);

        // Four bytes of padding after each element.
        let mut strided = Vec::new();
        for element in bytes.chunks(4) {
            strided.extend_from_slice(element);
            strided.extend_from_slice(&[0xEE; 4]);
        }
        let decoded = decode(&acc, &strided, Some(8)).unwrap();
        assert_eq!(
            decoded.data,
            AccessorData::Vec2(vec![Vec2::new(0.0, 65535.0), Vec2::new(13107.0, 300.0)])
        );

        acc.normalized = true;
        let decoded = decode(&acc, &bytes, None).unwrap();
        let AccessorData::Vec2(values) = decoded.data else {
            panic!("expected Vec2 data");
        };
        assert_eq!(values[0], Vec2::new(0.0, 1.0));
        assert_eq!(values[1].x, 0.2);
        assert_eq!(values[1].y, 300.0 / 65535.0);
    }

    #[test]
    fn test_unsigned_short_colors() {
        let bytes: Vec<u8> = [65535u16, 0, 13107, 65535].iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut acc = accessor(ComponentType::UnsignedShort, AttributeType::Vec4, 1);

        let decoded = decode(&acc, &bytes, None).unwrap();
        assert_eq!(
            decoded.data,
            AccessorData::Vec4(vec![Vec4::new(65535.0, 0.0, 13107.0, 65535.0)])
        );

        acc.normalized = true;
        let decoded = decode(&acc, &bytes, None).unwrap();
        assert_eq!(decoded.data, AccessorData::Vec4(vec![Vec4::new(1.0, 0.0, 0.2, 1.0)]));
    }

    #[test]
    fn test_unsigned_byte_colors_unnormalized() {
        let acc = accessor(ComponentType::UnsignedByte, AttributeType::Vec4, 1);
        let decoded = decode(&acc, &[1, 2, 3, 255], None).unwrap();
        assert_eq!(decoded.data, AccessorData::Vec4(vec![Vec4::new(1.0, 2.0, 3.0, 255.0)]));
    }

    #[test]
    fn test_index_scalars() {
        let acc = accessor(ComponentType::UnsignedByte, AttributeType::Scalar, 3);
        let indices = decode(&acc, &[0, 1, 2], None).unwrap().data.into_indices();
        assert_eq!(indices, Some(vec![0, 1, 2]));

        let bytes: Vec<u8> = [7u16, 300].iter().flat_map(|v| v.to_le_bytes()).collect();
        let acc = accessor(ComponentType::UnsignedShort, AttributeType::Scalar, 2);
        let data = decode(&acc, &bytes, None).unwrap().data;
        assert_eq!(data, AccessorData::U16(vec![7, 300]));
        assert_eq!(data.into_indices(), Some(vec![7, 300]));

        let bytes = 70_000u32.to_le_bytes();
        let acc = accessor(ComponentType::UnsignedInt, AttributeType::Scalar, 1);
        let data = decode(&acc, &bytes, None).unwrap().data;
        assert_eq!(data.into_indices(), Some(vec![70_000]));

        let data = AccessorData::F32(vec![1.0]);
        assert_eq!(data.into_indices(), None);
    }

    #[test]
    fn test_mat4_column_major() {
        let values: Vec<f32> = (0..16).map(|v| v as f32).collect();
        let acc = accessor(ComponentType::Float, AttributeType::Mat4, 1);
        let decoded = decode(&acc, &floats(&values), None).unwrap();
        let AccessorData::Mat4(matrices) = decoded.data else {
            panic!("expected Mat4 data");
        };
        assert_eq!(matrices[0].w_axis, Vec4::new(12.0, 13.0, 14.0, 15.0));
    }

    #[test]
    fn test_unsupported_layouts() {
        for (ct, at) in [
            (ComponentType::Byte, AttributeType::Vec3),
            (ComponentType::Short, AttributeType::Scalar),
            (ComponentType::Float, AttributeType::Mat3),
            (ComponentType::UnsignedInt, AttributeType::Vec3),
        ] {
            let acc = accessor(ct, at, 1);
            let err = decode(&acc, &[0; 64], None).unwrap_err();
            assert!(matches!(
                err,
                AssetError::UnsupportedLayout { component_type, attribute_type }
                    if component_type == ct && attribute_type == at
            ));
        }
    }

    #[test]
    fn test_stride_smaller_than_element() {
        let acc = accessor(ComponentType::Float, AttributeType::Vec3, 2);
        let err = decode(&acc, &[0; 24], Some(8)).unwrap_err();
        assert!(matches!(err, AssetError::InvalidStride { stride: 8, element_size: 12 }));
    }

    #[test]
    fn test_short_input() {
        let acc = accessor(ComponentType::Float, AttributeType::Vec3, 2);
        let err = decode(&acc, &[0; 23], None).unwrap_err();
        assert!(matches!(err, AssetError::Range { end: 24, len: 23, .. }));

        let acc = accessor(ComponentType::Float, AttributeType::Scalar, usize::MAX);
        assert!(matches!(decode(&acc, &[0; 4], None), Err(AssetError::Range { .. })));
    }

    #[test]
    fn test_empty_accessor() {
        let acc = accessor(ComponentType::Float, AttributeType::Vec3, 0);
        let decoded = decode(&acc, &[], None).unwrap();
        assert!(decoded.data.is_empty());
    }

    #[test]
    fn test_bounds_violation_is_not_fatal() {
        let mut acc = accessor(ComponentType::Float, AttributeType::Vec2, 2);
        acc.min = Some(vec![0.0, 0.0]);
        acc.max = Some(vec![1.0, 1.0]);
        let bytes = floats(&[0.5, 0.5, 2.0, -1.0]);

        let decoded = decode(&acc, &bytes, None).unwrap();
        assert_eq!(
            decoded.data,
            AccessorData::Vec2(vec![Vec2::new(0.5, 0.5), Vec2::new(2.0, -1.0)])
        );
        assert_eq!(decoded.diagnostics.len(), 2);
        assert_eq!(
            decoded.diagnostics[0],
            BoundsViolation { element: 1, component: 0, value: 2.0, min: Some(0.0), max: Some(1.0) }
        );
        assert_eq!(decoded.diagnostics[1].component, 1);

        let decoded = AccessorCodec::without_bounds_check().decode(&acc, &bytes, None).unwrap();
        assert!(decoded.diagnostics.is_empty());
    }

    #[test]
    fn test_float_bounds_compared_at_f32_precision() {
        let mut acc = accessor(ComponentType::Float, AttributeType::Scalar, 1);
        acc.min = Some(vec![0.1]);
        acc.max = Some(vec![0.1]);
        let decoded = decode(&acc, &floats(&[0.1]), None).unwrap();
        assert!(decoded.diagnostics.is_empty());
    }

    #[test]
    fn test_bounds_use_raw_values() {
        let mut acc = accessor(ComponentType::UnsignedByte, AttributeType::Vec4, 1);
        acc.normalized = true;
        acc.max = Some(vec![255.0, 255.0, 255.0, 128.0]);
        let decoded = decode(&acc, &[255, 255, 255, 255], None).unwrap();
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.diagnostics[0].value, 255.0);
    }

    #[test]
    fn test_span() {
        assert_eq!(span(0, 12, 12), Some(0));
        assert_eq!(span(3, 12, 20), Some(52));
        assert_eq!(span(usize::MAX, 4, 4), None);
    }
}
