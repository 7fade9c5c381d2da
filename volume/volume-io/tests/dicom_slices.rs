//! DICOM slices written to disk and loaded back as stacks.

#![allow(clippy::float_cmp)]

use std::path::Path;

use dicom::core::value::PixelFragmentSequence;
use dicom::core::value::Value;
use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::dictionary_std::tags;
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use volume_io::{load_slice_stack, SliceOrdering};
use volume_types::Shape;

const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";
const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";
const RLE_LOSSLESS: &str = "1.2.840.10008.1.2.5";

/// RLE Lossless fragment for 16-bit samples: two byte planes, high first,
/// each a single literal run.
fn rle_u16(values: &[u16]) -> Vec<u8> {
    let plane = |shift: u16| {
        let mut segment = vec![u8::try_from(values.len() - 1).unwrap()];
        segment.extend(values.iter().map(|v| ((v >> shift) & 0xff) as u8));
        if segment.len() % 2 == 1 {
            segment.push(0);
        }
        segment
    };
    let high = plane(8);
    let low = plane(0);

    let mut fragment = Vec::new();
    fragment.extend(2_u32.to_le_bytes());
    fragment.extend(64_u32.to_le_bytes());
    fragment.extend((64 + u32::try_from(high.len()).unwrap()).to_le_bytes());
    fragment.resize(64, 0);
    fragment.extend(high);
    fragment.extend(low);
    fragment
}

fn slice_header(cols: u16, position_z: f64) -> Vec<DataElement<InMemDicomObject>> {
    vec![
        DataElement::new(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(CT_IMAGE_STORAGE)),
        DataElement::new(
            tags::IMAGE_POSITION_PATIENT,
            VR::DS,
            PrimitiveValue::from(format!("0\\0\\{position_z}")),
        ),
        DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)),
        DataElement::new(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, PrimitiveValue::from("MONOCHROME2")),
        DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(1_u16)),
        DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(cols)),
        DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)),
        DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)),
        DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)),
        DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16)),
    ]
}

fn write(obj: InMemDicomObject, transfer_syntax: &str, uid: &str, path: &Path) {
    let file = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(transfer_syntax)
                .media_storage_sop_class_uid(CT_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(uid),
        )
        .unwrap();
    file.write_to_file(path).unwrap();
}

fn write_rle(path: &Path, values: &[u16], position_z: f64) {
    let mut elements = slice_header(u16::try_from(values.len()).unwrap(), position_z);
    elements.push(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        Value::PixelSequence(PixelFragmentSequence::new(Vec::<u32>::new(), vec![rle_u16(values)])),
    ));
    write(InMemDicomObject::from_element_iter(elements), RLE_LOSSLESS, "1.2.3.1", path);
}

fn write_native(path: &Path, values: &[u16], position_z: f64, rescale: Option<(f64, f64)>) {
    let mut elements = slice_header(u16::try_from(values.len()).unwrap(), position_z);
    if let Some((slope, intercept)) = rescale {
        elements.push(DataElement::new(tags::RESCALE_INTERCEPT, VR::DS, PrimitiveValue::from(intercept.to_string())));
        elements.push(DataElement::new(tags::RESCALE_SLOPE, VR::DS, PrimitiveValue::from(slope.to_string())));
    }
    elements.push(DataElement::new(
        tags::PIXEL_DATA,
        VR::OW,
        PrimitiveValue::U16(values.iter().copied().collect()),
    ));
    write(InMemDicomObject::from_element_iter(elements), EXPLICIT_VR_LE, "1.2.3.2", path);
}

#[test]
fn rle_slice_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("001.dcm");
    write_rle(&path, &[1, 256, 1000], 0.0);

    let (volume, ordering) = load_slice_stack(&[path]).unwrap();
    assert_eq!(ordering, SliceOrdering::Position);
    assert_eq!(volume.shape(), Shape::new(1, 1, 3));
    assert_eq!(volume.values(), &[1.0, 256.0, 1000.0]);
}

#[test]
fn compressed_and_native_slices_stack_together() {
    let dir = tempfile::tempdir().unwrap();
    let native = dir.path().join("a.dcm");
    let rle = dir.path().join("b.dcm");
    write_native(&native, &[1, 2, 3], 4.0, Some((2.0, -10.0)));
    write_rle(&rle, &[7, 8, 9], 0.0);

    let (volume, ordering) = load_slice_stack(&[native, rle]).unwrap();
    assert_eq!(ordering, SliceOrdering::Position);
    assert_eq!(volume.shape(), Shape::new(2, 1, 3));
    // The compressed slice sits lower and carries no rescale.
    assert_eq!(&volume.values()[..3], &[7.0, 8.0, 9.0]);
    assert_eq!(&volume.values()[3..], &[-8.0, -6.0, -4.0]);
    assert_eq!(volume.spacing().x, 4.0);
}
