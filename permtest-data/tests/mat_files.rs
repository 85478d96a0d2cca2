//! Reading pre-generated sample repositories from level-5 MAT files.
//!
//! The fixtures are written by a small uncompressed level-5 encoder
//! so the tests do not depend on external data.

use std::path::Path;

use permtest_data::matlab::read_mat_array;
use permtest_data::repository::{SampleRepository, DIMENSIONS_DIR, SAMPLE_SIZE_DIR};
use permtest_data::{DataAxis, SampleStore};

const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MX_DOUBLE_CLASS: u32 = 6;

fn pad8(len: usize) -> usize {
    (8 - len % 8) % 8
}

fn push_element(buf: &mut Vec<u8>, data_type: u32, payload: &[u8]) {
    buf.extend_from_slice(&data_type.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    buf.extend(std::iter::repeat(0u8).take(pad8(payload.len())));
}

/// Write one real double array as an uncompressed level-5 MAT file.
fn write_mat(path: &Path, name: &str, dims: &[usize], col_major: &[f64]) {
    assert_eq!(dims.iter().product::<usize>(), col_major.len());

    let mut header = vec![b' '; 116];
    let text = b"MATLAB 5.0 MAT-file, written by permtest tests";
    header[..text.len()].copy_from_slice(text);
    header.extend_from_slice(&[0u8; 8]);
    header.extend_from_slice(&0x0100u16.to_le_bytes());
    header.extend_from_slice(b"IM");

    let mut body = Vec::new();
    let mut flags = Vec::new();
    flags.extend_from_slice(&MX_DOUBLE_CLASS.to_le_bytes());
    flags.extend_from_slice(&0u32.to_le_bytes());
    push_element(&mut body, MI_UINT32, &flags);

    let dim_bytes: Vec<u8> = dims
        .iter()
        .flat_map(|&d| (d as i32).to_le_bytes())
        .collect();
    push_element(&mut body, MI_INT32, &dim_bytes);
    push_element(&mut body, MI_INT8, name.as_bytes());

    let values: Vec<u8> = col_major.iter().flat_map(|v| v.to_le_bytes()).collect();
    push_element(&mut body, MI_DOUBLE, &values);

    let mut file = header;
    file.extend_from_slice(&MI_MATRIX.to_le_bytes());
    file.extend_from_slice(&(body.len() as u32).to_le_bytes());
    file.extend_from_slice(&body);
    std::fs::write(path, file).unwrap();
}

#[test]
fn test_read_three_dimensional_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arr.mat");
    // shape (2, 2, 2), value = i + 10 j + 100 r
    let mut data = Vec::new();
    for r in 0..2 {
        for j in 0..2 {
            for i in 0..2 {
                data.push((i + 10 * j + 100 * r) as f64);
            }
        }
    }
    write_mat(&path, "X", &[2, 2, 2], &data);

    let arr = read_mat_array(&path, "X").unwrap();
    assert_eq!(arr.n_samples(), 2);
    assert_eq!(arr.n_dimensions(), 2);
    assert_eq!(arr.repetitions(), 2);
    let rep1 = arr.repetition(1);
    assert_eq!(rep1.get(0, 0), 100.0);
    assert_eq!(rep1.get(1, 1), 111.0);
}

#[test]
fn test_two_dimensional_array_is_one_repetition() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.mat");
    write_mat(&path, "Y", &[3, 1], &[1.0, 2.0, 3.0]);
    let arr = read_mat_array(&path, "Y").unwrap();
    assert_eq!(arr.repetitions(), 1);
    assert_eq!(arr.repetition(0).col(0), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_missing_array_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.mat");
    write_mat(&path, "Y", &[3, 1], &[1.0, 2.0, 3.0]);
    let err = read_mat_array(&path, "X").unwrap_err();
    assert!(err.to_string().contains("'X' not found"));
}

#[test]
fn test_repository_load_dimension_sweep() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(DIMENSIONS_DIR)).unwrap();
    let base = dir.path().join(DIMENSIONS_DIR);
    let x: Vec<f64> = (0..12).map(|v| v as f64).collect();
    let y: Vec<f64> = (0..12).map(|v| -(v as f64)).collect();
    write_mat(&base.join("type_3_dim_2_X.mat"), "X", &[3, 2, 2], &x);
    write_mat(&base.join("type_3_dim_2_Y.mat"), "Y", &[3, 2, 2], &y);

    let repo = SampleRepository::new(dir.path());
    let (xs, ys) = repo.load("3", DataAxis::Dimension(2)).unwrap();
    assert_eq!(xs.repetitions(), 2);
    assert_eq!(ys.repetition(1).get(0, 0), -6.0);
}

#[test]
fn test_repository_rejects_mismatched_repetitions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(SAMPLE_SIZE_DIR)).unwrap();
    let base = dir.path().join(SAMPLE_SIZE_DIR);
    write_mat(&base.join("type_1_size_2_X.mat"), "X", &[2, 1, 2], &[0.0; 4]);
    write_mat(&base.join("type_1_size_2_Y.mat"), "Y", &[2, 1, 3], &[0.0; 6]);

    let repo = SampleRepository::new(dir.path());
    assert!(repo.load("1", DataAxis::SampleSize(2)).is_err());
}
