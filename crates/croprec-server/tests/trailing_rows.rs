//! Property tests for the first-row-only response of `/predict`

use croprec_core::PredictionRequest;
use croprec_server::PredictionService;
use proptest::prelude::*;
use std::sync::OnceLock;

const DEMO_ARTIFACT: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../models/crop_recommendation_model.json"
);

const COLUMNS: [&str; 7] = ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

fn service() -> &'static PredictionService {
    static SERVICE: OnceLock<PredictionService> = OnceLock::new();
    SERVICE.get_or_init(|| PredictionService::load(DEMO_ARTIFACT).unwrap())
}

fn crop_row() -> impl Strategy<Value = [f64; 7]> {
    (
        0u32..150,
        0u32..150,
        0u32..210,
        5.0f64..45.0,
        10.0f64..100.0,
        3.5f64..10.0,
        20.0f64..300.0,
    )
        .prop_map(|(n, p, k, t, h, ph, r)| [n as f64, p as f64, k as f64, t, h, ph, r])
}

fn request(rows: &[[f64; 7]]) -> PredictionRequest {
    COLUMNS
        .iter()
        .enumerate()
        .fold(PredictionRequest::new(), |req, (i, name)| {
            req.with_rows(*name, rows.iter().map(|row| row[i]))
        })
}

proptest! {
    #[test]
    fn first_row_label_ignores_trailing_rows(
        first in crop_row(),
        trailing in prop::collection::vec(crop_row(), 0..6),
    ) {
        let service = service();
        let alone = service.predict_first(&request(&[first])).unwrap();

        let mut rows = vec![first];
        rows.extend(trailing.iter().copied());
        let with_trailing = service.predict_first(&request(&rows)).unwrap();

        let mut reversed = vec![first];
        reversed.extend(trailing.iter().rev().copied());
        let with_reversed = service.predict_first(&request(&reversed)).unwrap();

        prop_assert_eq!(&alone, &with_trailing);
        prop_assert_eq!(&alone, &with_reversed);

        let all = service.predict_all(&request(&rows)).unwrap();
        prop_assert_eq!(all.len(), rows.len());
        prop_assert_eq!(&all[0], &alone);
    }
}
