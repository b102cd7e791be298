//! Property tests for folder display order.
//!
//! Any interleaving of create, delete, reorder and move keeps `sort_order` dense
//! (`0..N`) and matches a plain in-memory list driven by the same operations.

use proptest::prelude::*;
use readlist_core::db::open_db_in_memory;
use readlist_core::service::folder_service::apply_move;
use readlist_core::{EventBus, FolderId, FolderService, SqliteFolderRepository};

#[derive(Debug, Clone)]
enum FolderOp {
    Create(String),
    /// Offset into the current list, taken modulo its length.
    Delete(usize),
    Move { sources: Vec<usize>, destination: usize },
    /// Sort keys for a full permutation; the folder at offset `i` sorts by
    /// `keys[i % keys.len()]`, ties keep their current order.
    Reorder(Vec<u8>),
}

fn arb_op() -> impl Strategy<Value = FolderOp> {
    prop_oneof![
        3 => "[A-Za-z][A-Za-z0-9 ]{0,12}".prop_map(FolderOp::Create),
        1 => (0usize..16).prop_map(FolderOp::Delete),
        2 => (proptest::collection::vec(0usize..16, 1..4), 0usize..17)
            .prop_map(|(sources, destination)| FolderOp::Move { sources, destination }),
        1 => proptest::collection::vec(any::<u8>(), 1..8).prop_map(FolderOp::Reorder),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn folder_order_stays_dense_and_matches_model(ops in proptest::collection::vec(arb_op(), 1..24)) {
        let conn = open_db_in_memory().unwrap();
        let service = FolderService::new(
            SqliteFolderRepository::try_new(&conn).unwrap(),
            EventBus::new(),
        );
        let mut model: Vec<FolderId> = Vec::new();

        for op in ops {
            match op {
                FolderOp::Create(name) => {
                    let folder = service.create_folder(name).unwrap();
                    prop_assert_eq!(folder.sort_order, model.len() as i64);
                    model.push(folder.uuid);
                }
                FolderOp::Delete(offset) => {
                    if model.is_empty() {
                        continue;
                    }
                    let victim = model.remove(offset % model.len());
                    service.delete_folder(victim).unwrap();
                }
                FolderOp::Reorder(keys) => {
                    let mut keyed: Vec<(u8, usize, FolderId)> = model
                        .iter()
                        .enumerate()
                        .map(|(offset, id)| (keys[offset % keys.len()], offset, *id))
                        .collect();
                    keyed.sort();
                    model = keyed.into_iter().map(|(_, _, id)| id).collect();
                    service.reorder_folders(&model).unwrap();
                }
                FolderOp::Move { sources, destination } => {
                    if model.is_empty() {
                        continue;
                    }
                    let len = model.len();
                    let sources: Vec<usize> = sources.iter().map(|offset| offset % len).collect();
                    let destination = destination % (len + 1);
                    model = apply_move(&model, &sources, destination).unwrap();
                    service.move_folders(&sources, destination).unwrap();
                }
            }

            let stored = service.list_folders().unwrap();
            let ids: Vec<FolderId> = stored.iter().map(|folder| folder.uuid).collect();
            let orders: Vec<i64> = stored.iter().map(|folder| folder.sort_order).collect();
            let dense: Vec<i64> = (0..stored.len() as i64).collect();
            prop_assert_eq!(&ids, &model);
            prop_assert_eq!(orders, dense);
        }
    }
}
