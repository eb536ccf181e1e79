use pricing_trainer::dataset::{ColumnData, CleanedTable};
use pricing_trainer::split::test_count;
use pricing_trainer::{train_test_split, DataParams};
use proptest::prelude::*;

fn data_params() -> DataParams {
    DataParams {
        columns: vec!["city".into(), "price".into(), "area".into()],
        target: "price".into(),
        categorical: vec!["city".into()],
    }
}

/// One listing row; `None` renders as an NA token.
fn listing_row() -> impl Strategy<Value = (Option<u8>, Option<u32>, Option<u16>, Option<u8>)> {
    (
        prop::option::weighted(0.85, 0u8..4),
        prop::option::weighted(0.85, 1u32..1_000_000),
        prop::option::weighted(0.85, 1u16..500),
        prop::option::weighted(0.85, 0u8..9),
    )
}

const NA: [&str; 4] = ["", "NaN", "NA", "null"];

proptest! {
    #[test]
    fn split_is_disjoint_covering_and_reproducible(
        n in 2usize..400,
        test_size in 0.01f64..0.99,
        seed in any::<u64>(),
    ) {
        let n_test = test_count(n, test_size);
        prop_assume!(n_test >= 1 && n_test < n);

        let split = train_test_split(n, test_size, seed).unwrap();
        prop_assert_eq!(split.test.len(), n_test);
        prop_assert_eq!(split.train.len(), n - n_test);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        prop_assert_eq!(all, (0..n).collect::<Vec<_>>());

        prop_assert_eq!(split, train_test_split(n, test_size, seed).unwrap());
    }
}

proptest! {
    #[test]
    fn cleaned_rows_never_contain_missing_values(
        rows in prop::collection::vec(listing_row(), 1..60),
        na_pick in 0usize..4,
    ) {
        let cities = ["Lahore", "Karachi", "Islamabad", "Multan"];
        let na = NA[na_pick];

        let mut csv = String::from("city,price,area,agent\n");
        let mut complete = 0;
        for (city, price, area, agent) in &rows {
            if city.is_some() && price.is_some() && area.is_some() && agent.is_some() {
                complete += 1;
            }
            csv.push_str(&format!(
                "{},{},{},{}\n",
                city.map_or(na.to_string(), |c| cities[c as usize].to_string()),
                price.map_or(na.to_string(), |p| p.to_string()),
                area.map_or(na.to_string(), |a| a.to_string()),
                agent.map_or(na.to_string(), |a| format!("Agent {a}")),
            ));
        }

        match CleanedTable::from_reader(csv.as_bytes(), &data_params()) {
            Ok(table) => {
                prop_assert_eq!(table.len(), complete);
                prop_assert_eq!(table.rows_read, rows.len());
                prop_assert_eq!(table.rows_dropped, rows.len() - complete);
                for column in &table.columns {
                    match &column.data {
                        ColumnData::Numeric(values) => {
                            prop_assert!(values.iter().all(|v| v.is_finite()));
                        }
                        ColumnData::Categorical(values) => {
                            prop_assert!(values.iter().all(|v| !v.is_empty() && v != na));
                        }
                    }
                }
            }
            Err(_) => prop_assert_eq!(complete, 0),
        }
    }
}
