//! Parameter forwarding shared by the async and blocking facades
//!
//! Both facades take the same arguments and hand them to the driver in the
//! same shape. The mapping lives here once so the two executors cannot drift.

use bson::{Bson, Document};
use mongodb::options::{
    FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument, UpdateOptions,
};
use std::collections::HashMap;

/// Filter that matches every document when none was given
pub fn filter_or_all(filter: Option<Document>) -> Document {
    filter.unwrap_or_default()
}

pub fn find_one_options(projection: Option<Document>, sort: Option<Document>) -> FindOneOptions {
    let mut options = FindOneOptions::default();
    options.projection = projection;
    options.sort = sort;
    options
}

/// Options for a multi-document find.
///
/// `skip == 0` and `limit == 0` both mean "unset".
pub fn find_options(
    projection: Option<Document>,
    sort: Option<Document>,
    skip: u64,
    limit: i64,
) -> FindOptions {
    let mut options = FindOptions::default();
    options.projection = projection;
    options.sort = sort;
    if skip > 0 {
        options.skip = Some(skip);
    }
    if limit != 0 {
        options.limit = Some(limit);
    }
    options
}

pub fn update_options(upsert: bool) -> UpdateOptions {
    let mut options = UpdateOptions::default();
    options.upsert = Some(upsert);
    options
}

pub fn find_one_and_update_options(
    projection: Option<Document>,
    sort: Option<Document>,
    return_document: ReturnDocument,
) -> FindOneAndUpdateOptions {
    let mut options = FindOneAndUpdateOptions::default();
    options.projection = projection;
    options.sort = sort;
    options.return_document = Some(return_document);
    options
}

/// Flatten the driver's index-keyed ids into input order
pub fn ordered_ids(inserted_ids: HashMap<usize, Bson>) -> Vec<Bson> {
    let mut ids: Vec<(usize, Bson)> = inserted_ids.into_iter().collect();
    ids.sort_unstable_by_key(|(index, _)| *index);
    ids.into_iter().map(|(_, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    #[test]
    fn test_filter_or_all() {
        assert!(filter_or_all(None).is_empty());

        let filter = doc! { "a": 1 };
        assert_eq!(filter_or_all(Some(filter.clone())), filter);
    }

    #[test]
    fn test_find_one_options() {
        let projection = doc! { "name": 1, "_id": 0 };
        let sort = doc! { "created_at": -1 };

        let options = find_one_options(Some(projection.clone()), Some(sort.clone()));
        assert_eq!(options.projection, Some(projection));
        assert_eq!(options.sort, Some(sort));

        let options = find_one_options(None, None);
        assert!(options.projection.is_none());
        assert!(options.sort.is_none());
    }

    #[test]
    fn test_find_options_zero_is_unset() {
        let options = find_options(None, None, 0, 0);
        assert_eq!(options.skip, None);
        assert_eq!(options.limit, None);
    }

    #[test]
    fn test_find_options_skip_and_limit() {
        let sort = doc! { "a": 1 };
        let options = find_options(None, Some(sort.clone()), 1, 1);
        assert_eq!(options.skip, Some(1));
        assert_eq!(options.limit, Some(1));
        assert_eq!(options.sort, Some(sort));
    }

    #[test]
    fn test_find_options_keeps_sort_key_order() {
        let sort = doc! { "b": -1, "a": 1 };
        let options = find_options(None, Some(sort), 0, 0);
        let keys: Vec<&String> = options.sort.as_ref().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_find_options_negative_limit_forwarded() {
        // Negative limits are the driver's single-batch form; pass them through
        let options = find_options(None, None, 0, -5);
        assert_eq!(options.limit, Some(-5));
    }

    #[test]
    fn test_update_options() {
        assert_eq!(update_options(false).upsert, Some(false));
        assert_eq!(update_options(true).upsert, Some(true));
    }

    #[test]
    fn test_find_one_and_update_options() {
        let options = find_one_and_update_options(None, Some(doc! { "a": 1 }), ReturnDocument::Before);
        assert!(matches!(options.return_document, Some(ReturnDocument::Before)));
        assert_eq!(options.sort, Some(doc! { "a": 1 }));

        let options = find_one_and_update_options(Some(doc! { "a": 1 }), None, ReturnDocument::After);
        assert!(matches!(options.return_document, Some(ReturnDocument::After)));
        assert_eq!(options.projection, Some(doc! { "a": 1 }));
    }

    #[test]
    fn test_ordered_ids_follow_input_order() {
        let first = ObjectId::new();
        let second = ObjectId::new();
        let third = ObjectId::new();

        let mut inserted = HashMap::new();
        inserted.insert(2, Bson::ObjectId(third));
        inserted.insert(0, Bson::ObjectId(first));
        inserted.insert(1, Bson::ObjectId(second));

        assert_eq!(
            ordered_ids(inserted),
            vec![Bson::ObjectId(first), Bson::ObjectId(second), Bson::ObjectId(third)]
        );
    }

    #[test]
    fn test_ordered_ids_keeps_client_supplied_ids() {
        let mut inserted = HashMap::new();
        inserted.insert(1, Bson::String("b".to_string()));
        inserted.insert(0, Bson::Int32(7));

        assert_eq!(
            ordered_ids(inserted),
            vec![Bson::Int32(7), Bson::String("b".to_string())]
        );
    }

    #[test]
    fn test_ordered_ids_empty() {
        assert!(ordered_ids(HashMap::new()).is_empty());
    }
}
