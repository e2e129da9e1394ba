//! Property-based tests for inference, sniffing, and sheet naming.

use proptest::prelude::*;

use sheetflow::convert::SheetNamer;
use sheetflow::{FormatSniffer, TypeInferencer};

proptest! {
    /// Inference never panics and always yields one value per input cell.
    #[test]
    fn inference_total_on_arbitrary_cells(cells in proptest::collection::vec(".{0,20}", 0..50)) {
        let inferencer = TypeInferencer::new();
        let (values, _ty) = inferencer.infer_column(&cells);
        prop_assert_eq!(values.len(), cells.len());
    }

    /// Same column in, same type out.
    #[test]
    fn inference_is_deterministic(cells in proptest::collection::vec("[0-9a-z.,-]{0,12}", 1..30)) {
        let inferencer = TypeInferencer::new();
        let (first_values, first_ty) = inferencer.infer_column(&cells);
        let (second_values, second_ty) = inferencer.infer_column(&cells);
        prop_assert_eq!(first_ty, second_ty);
        prop_assert_eq!(first_values, second_values);
    }

    /// Detection never panics on arbitrary bytes and always returns a
    /// delimiter from the candidate set.
    #[test]
    fn sniffing_total_on_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let format = FormatSniffer::new().detect_from_sample(&bytes);
        prop_assert!([b',', b'\t', b';', b'|'].contains(&format.delimiter));
        prop_assert!((0.0..=1.0).contains(&format.confidence));
    }

    /// Every allocated sheet name is unique (case-insensitively) and
    /// within the 31-character limit, whatever the input stems.
    #[test]
    fn sheet_names_unique_and_bounded(stems in proptest::collection::vec(".{0,40}", 1..20)) {
        let mut namer = SheetNamer::new();
        let names: Vec<String> = stems.iter().map(|s| namer.name_for(s)).collect();

        for name in &names {
            prop_assert!(name.chars().count() <= 31);
            prop_assert!(!name.is_empty());
        }
        let mut lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        lowered.sort();
        let before = lowered.len();
        lowered.dedup();
        prop_assert_eq!(before, lowered.len());
    }
}
