mod common;

use anyhow::Result;
use recbatch::{
    BatchIter, BatchIterConfig, Error, IndexedRecordFile, IndexedRecordWriter, Mode,
};
use tempfile::tempdir;

use common::{png_bytes, solid_store};

fn eval_iter(n: u64, batch_size: usize, side: i64) -> BatchIter<recbatch::InMemoryStore> {
    let config = BatchIterConfig::builder()
        .batch_size(batch_size)
        .mode(Mode::Test)
        .shape((3, side, side))
        .seed(42)
        .build();
    BatchIter::new(solid_store(n, side as u32, side as u32), config).unwrap()
}

#[test]
fn test_epoch_emits_ceil_batches() -> Result<()> {
    for (n, batch_size, expected) in [
        (5u64, 2usize, 3usize),
        (6, 2, 3),
        (1, 1, 1),
        (7, 3, 3),
        (4, 4, 1),
        (3, 5, 1), // batch larger than the dataset: wraps, single batch
    ] {
        let mut iter = eval_iter(n, batch_size, 8);
        let mut produced = 0;
        while iter.has_next() {
            iter.next_batch()?;
            produced += 1;
        }
        assert_eq!(produced, expected, "N={n} B={batch_size}");
        assert!(matches!(iter.next_batch(), Err(Error::EndOfEpoch)));
    }
    Ok(())
}

#[test]
fn test_end_to_end_five_records_batch_of_two() -> Result<()> {
    let mut iter = eval_iter(5, 2, 8);

    let mut indices = Vec::new();
    let mut pads = Vec::new();
    for _ in 0..3 {
        let batch = iter.next_batch()?;
        indices.push(batch.index);
        pads.push(batch.pad);
        assert_eq!(batch.images.size(), vec![2, 3, 8, 8]);
        assert_eq!(batch.labels.size(), vec![2]);
    }

    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(pads, vec![0, 0, 1]); // only the final batch reports filler
    assert!(matches!(iter.next_batch(), Err(Error::EndOfEpoch)));
    Ok(())
}

#[test]
fn test_pad_amount_is_stable_within_epoch() -> Result<()> {
    let mut iter = eval_iter(5, 2, 8);
    assert_eq!(iter.pad_amount(), 1);
    iter.next_batch()?;
    assert_eq!(iter.pad_amount(), 1);
    iter.reset();
    assert_eq!(iter.pad_amount(), 1);

    let even = eval_iter(6, 2, 8);
    assert_eq!(even.pad_amount(), 0);
    Ok(())
}

#[test]
fn test_reset_rewinds_to_index_zero() -> Result<()> {
    let mut iter = eval_iter(5, 2, 8);
    while iter.has_next() {
        iter.next_batch()?;
    }
    assert_eq!(iter.current_index(), 2);

    iter.reset();
    assert_eq!(iter.current_index(), -1);
    let first = iter.next_batch()?;
    assert_eq!(first.index, 0);
    Ok(())
}

#[test]
fn test_read_window_advances_one_key_per_batch() -> Result<()> {
    // labels equal keys, so the stride-1 overlap between consecutive
    // batches is directly observable
    let mut iter = eval_iter(6, 3, 8);

    let first: Vec<f32> = (&iter.next_batch()?.labels).try_into()?;
    let second: Vec<f32> = (&iter.next_batch()?.labels).try_into()?;

    assert_eq!(second[0], first[1]);
    assert_eq!(second[1], first[2]);
    Ok(())
}

#[test]
fn test_seeded_epochs_are_reproducible() -> Result<()> {
    let mut a = eval_iter(10, 4, 8);
    let mut b = eval_iter(10, 4, 8);

    for _ in 0..2 {
        let batch_a = a.next_batch()?;
        let batch_b = b.next_batch()?;
        assert_eq!(batch_a.labels, batch_b.labels);
        assert_eq!(batch_a.images, batch_b.images);
    }
    Ok(())
}

#[test]
fn test_reshuffle_changes_key_order_across_epochs() -> Result<()> {
    let mut iter = eval_iter(32, 8, 8);
    let epoch0: Vec<f32> = (&iter.next_batch()?.labels).try_into()?;

    while iter.has_next() {
        iter.next_batch()?;
    }
    iter.reset();
    let epoch1: Vec<f32> = (&iter.next_batch()?.labels).try_into()?;

    assert_ne!(epoch0, epoch1);
    Ok(())
}

#[test]
fn test_batches_are_views_over_reused_buffers() -> Result<()> {
    let mut iter = eval_iter(6, 2, 8);

    let stale = iter.next_batch()?;
    let stale_labels: Vec<f32> = (&stale.labels).try_into()?;
    let fresh = iter.next_batch()?;

    // the first batch's view now shows the second batch's data
    let overwritten: Vec<f32> = (&stale.labels).try_into()?;
    let fresh_labels: Vec<f32> = (&fresh.labels).try_into()?;
    assert_eq!(overwritten, fresh_labels);
    assert_ne!(overwritten, stale_labels);
    Ok(())
}

#[test]
fn test_bgr_payload_lands_as_rgb_channel_first() -> Result<()> {
    // a solid blue image: RGB (0, 0, 255); after decode (BGR) and the
    // pipeline's reorder, channel 0 must be ~0 and channel 2 must be ~255
    let store = recbatch::InMemoryStore::new(vec![(0, 1.0, png_bytes(16, 16, [0, 0, 255]))]);
    let config = BatchIterConfig::builder()
        .batch_size(1)
        .mode(Mode::Validation)
        .shape((3, 16, 16))
        .seed(0)
        .build();
    let mut iter = BatchIter::new(store, config)?;

    let batch = iter.next_batch()?;
    assert_eq!(batch.images.double_value(&[0, 0, 0, 0]), 0.0);
    assert_eq!(batch.images.double_value(&[0, 1, 0, 0]), 0.0);
    assert_eq!(batch.images.double_value(&[0, 2, 0, 0]), 255.0);
    let labels: Vec<f32> = (&batch.labels).try_into()?;
    assert_eq!(labels, vec![1.0]);
    Ok(())
}

#[test]
fn test_train_mode_over_file_backed_store() -> Result<()> {
    let dir = tempdir()?;
    let prefix = dir.path().join("train");

    let mut writer = IndexedRecordWriter::create(&prefix)?;
    for key in 0..5u64 {
        writer.append(key, (key % 2) as f32, &png_bytes(96, 96, [60, 60, 60]))?;
    }
    writer.finish()?;

    let store = IndexedRecordFile::open(&prefix)?;
    let config = BatchIterConfig::builder()
        .batch_size(2)
        .mode(Mode::Train)
        .shape((3, 64, 64))
        .seed(123)
        .build();
    let mut iter = BatchIter::new(store, config)?;

    let mut produced = 0;
    while iter.has_next() {
        let batch = iter.next_batch()?;
        assert_eq!(batch.images.size(), vec![2, 3, 64, 64]);
        produced += 1;
    }
    assert_eq!(produced, 3);
    Ok(())
}

#[test]
fn test_decode_failure_aborts_the_batch() -> Result<()> {
    let store = recbatch::InMemoryStore::new(vec![
        (0, 0.0, png_bytes(8, 8, [1, 2, 3])),
        (1, 1.0, b"not an image".to_vec()),
    ]);
    let config = BatchIterConfig::builder()
        .batch_size(2)
        .mode(Mode::Test)
        .shape((3, 8, 8))
        .seed(0)
        .build();
    let mut iter = BatchIter::new(store, config)?;

    let err = iter.next_batch().unwrap_err();
    assert!(matches!(err, Error::Decode { key: 1, .. }));
    Ok(())
}
