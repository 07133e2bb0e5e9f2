#![no_main]

use adaptive_hyperloglog::{Config, Mode, SparseEstimation};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let (header, items) = data.split_at(2);
    let precision = 2 + header[0] % 17;
    let estimation = if header[1] & 1 == 0 {
        SparseEstimation::Corrected
    } else {
        SparseEstimation::Compatible
    };
    let mode = if header[1] & 2 == 0 { Mode::Sparse } else { Mode::Dense };

    let mut estimator = Config::new(precision)
        .mode(mode)
        .sparse_estimation(estimation)
        .build()
        .unwrap();
    assert_eq!(estimator.estimate(), 0.0);

    let mut became_dense = mode == Mode::Dense;
    for chunk in items.chunks(4) {
        estimator.insert(&chunk);
        estimator.insert_hash(wyhash(chunk, 0));

        let estimate = estimator.estimate();
        assert!(estimate.is_finite() && estimate > 0.0);
        assert!(estimator.size_of() > 0);

        // representation never returns to sparse
        if became_dense {
            assert_eq!(estimator.mode(), Mode::Dense);
        }
        became_dense = estimator.mode() == Mode::Dense;
    }
});
