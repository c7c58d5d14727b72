use std::cmp::Ordering;

use super::{AvlDictionary, Compare, Error, PartialOrder};


const N: i32 = 1_000;
const LARGE_N: i32 = 10_000_000;

// Worst case height of an AVL tree holding `len` nodes.
fn max_height(len: usize) -> usize {
    (1.44 * ((len + 2) as f64).log2() - 0.328) as usize
}

#[test]
fn test_new() {
    let dict_i32 = AvlDictionary::<i32, ()>::new();
    assert!(dict_i32.is_empty());
    assert_eq!(dict_i32.height(), None);
    dict_i32.check_consistency();

    let dict_i8 = AvlDictionary::<i8, ()>::new();
    assert!(dict_i8.is_empty());
    dict_i8.check_consistency();

    let dict_string = AvlDictionary::<String, String>::new();
    assert!(dict_string.is_empty());
    dict_string.check_consistency();
}

#[test]
fn test_rebalance() {
    {
        //     3 ->   2
        //    /      / \
        //   2      1   3
        //  /
        // 1
        let mut dict = AvlDictionary::new();
        dict.insert(3, ());
        dict.insert(2, ());
        dict.insert(1, ());
        dict.check_consistency();
        assert_eq!(dict.height(), Some(1));
    }
    {
        //     3   ->     3 ->   2
        //    / \        /      / \
        //   2   4      2      1   3
        //  /          /
        // 1          1
        let mut dict = AvlDictionary::new();
        dict.insert(3, ());
        dict.insert(2, ());
        dict.insert(4, ());
        dict.insert(1, ());
        dict.check_consistency();
        assert_eq!(dict.height(), Some(2));
        dict.remove(&4);
        dict.check_consistency();
        assert_eq!(dict.height(), Some(1));
    }
    {
        //   3  ->   2
        //  /       / \
        // 1       1   3
        //  \
        //   2
        let mut dict = AvlDictionary::new();
        dict.insert(3, ());
        dict.insert(1, ());
        dict.insert(2, ());
        dict.check_consistency();
        assert_eq!(dict.height(), Some(1));
    }
    {
        //   3   ->   3  ->   2
        //  / \      /       / \
        // 1   4    1       1   3
        //  \        \
        //   2        2
        let mut dict = AvlDictionary::new();
        dict.insert(3, ());
        dict.insert(1, ());
        dict.insert(4, ());
        dict.insert(2, ());
        dict.check_consistency();
        assert_eq!(dict.height(), Some(2));
        dict.remove(&4);
        dict.check_consistency();
        assert_eq!(dict.height(), Some(1));
    }
    {
        // 1 ->    2
        //  \     / \
        //   2   1   3
        //    \
        //     3
        let mut dict = AvlDictionary::new();
        dict.insert(1, ());
        dict.insert(2, ());
        dict.insert(3, ());
        dict.check_consistency();
        assert_eq!(dict.height(), Some(1));
    }
    {
        //   1     -> 1     ->    2
        //  / \        \         / \
        // 0   2        2       1   3
        //      \        \
        //       3        3
        let mut dict = AvlDictionary::new();
        dict.insert(1, ());
        dict.insert(0, ());
        dict.insert(2, ());
        dict.insert(3, ());
        dict.check_consistency();
        assert_eq!(dict.height(), Some(2));
        dict.remove(&0);
        dict.check_consistency();
        assert_eq!(dict.height(), Some(1));
    }
    {
        // 1   ->  2
        //  \     / \
        //   3   1   3
        //  /
        // 2
        let mut dict = AvlDictionary::new();
        dict.insert(1, ());
        dict.insert(3, ());
        dict.insert(2, ());
        dict.check_consistency();
        assert_eq!(dict.height(), Some(1));
    }
    {
        //   1   ->  1   ->  2
        //  / \       \     / \
        // 0   3       3   1   3
        //    /       /
        //   2       2
        let mut dict = AvlDictionary::new();
        dict.insert(1, ());
        dict.insert(0, ());
        dict.insert(3, ());
        dict.insert(2, ());
        dict.check_consistency();
        assert_eq!(dict.height(), Some(2));
        dict.remove(&0);
        dict.check_consistency();
        assert_eq!(dict.height(), Some(1));
    }
}

#[test]
fn test_ascending_seven() {
    let mut dict = AvlDictionary::new();
    for key in 1..=7 {
        dict.insert(key, key * 10);
        dict.check_consistency();
    }
    assert_eq!(dict.height(), Some(2));
}

#[test]
fn test_scenario() {
    let mut dict = AvlDictionary::new();
    for (key, value) in [(5, "e"), (3, "c"), (8, "h"), (1, "a"), (4, "d")] {
        assert_eq!(dict.insert(key, value), None);
        dict.check_consistency();
    }
    assert_eq!(dict.len(), 5);
    assert_eq!(dict.search(&3), Some(&"c"));

    let entries: Vec<(i32, &str)> = dict.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(entries, [(1, "a"), (3, "c"), (4, "d"), (5, "e"), (8, "h")]);

    assert_eq!(dict.remove(&5), Some("e"));
    dict.check_consistency();
    assert!(dict.search(&5).is_none());
    assert_eq!(dict.len(), 4);
}

#[test]
fn test_insert() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut dict = AvlDictionary::new();
    for value in &values {
        assert_eq!(dict.insert(*value, *value), None);
        dict.check_consistency();
    }
    assert!(dict.len() == values.len());

    for value in &values {
        assert_eq!(dict.insert(*value, value.wrapping_add(1)), Some(*value));
    }
    assert!(dict.len() == values.len());
    dict.check_consistency();
}

#[test]
fn test_insert_replaces_value() {
    let mut dict = AvlDictionary::new();
    assert_eq!(dict.insert("k", 1), None);
    assert_eq!(dict.insert("k", 2), Some(1));
    assert_eq!(dict.search(&"k"), Some(&2));
    assert_eq!(dict.len(), 1);
    dict.check_consistency();
}

#[test]
fn test_insert_sorted_range() {
    let mut dict = AvlDictionary::new();
    for value in 0..N {
        assert!(dict.insert(value, value).is_none());
        dict.check_consistency();
    }
    assert!(dict.len() == N as usize);
    let height = dict.height().unwrap();
    assert!(height > 0);
    assert!(height <= max_height(dict.len()));
    assert!(dict.search(&-42).is_none());
}

#[test]
fn test_insert_shuffled_range() {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut values: Vec<i32> = (0..N).collect();
    let mut rng = StdRng::seed_from_u64(0);
    values.shuffle(&mut rng);

    let mut dict = AvlDictionary::new();
    for value in &values {
        assert!(dict.insert(*value, "foo").is_none());
        dict.check_consistency();
    }
    assert!(dict.len() == values.len());
    assert!(dict.height().unwrap() <= max_height(dict.len()));

    for value in &values {
        assert_eq!(dict.insert(*value, "bar"), Some("foo"));
    }
    assert!(dict.len() == values.len());
    assert!(dict.search(&-42).is_none());
}

#[test]
fn test_search() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut dict = AvlDictionary::new();
    assert!(dict.search(&42).is_none());
    for value in &values {
        dict.insert(*value, value.wrapping_add(1));
    }

    for value in &values {
        let got = dict.search(value);
        assert_eq!(got, Some(&value.wrapping_add(1)));
        let got = dict.search_key_value(value);
        assert_eq!(got, Some((value, &(value.wrapping_add(1)))));
        assert!(dict.contains_key(value));
    }
}

#[test]
fn test_search_mut() {
    let mut dict: AvlDictionary<_, _> = (0..10).map(|key| (key, key)).collect();
    if let Some(value) = dict.search_mut(&7) {
        *value = 70;
    }
    assert_eq!(dict.search(&7), Some(&70));
    assert!(dict.search_mut(&10).is_none());
}

#[test]
fn test_clear() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut dict = AvlDictionary::new();
    for value in &values {
        dict.insert(*value, String::from("foo"));
    }
    assert!(!dict.is_empty());
    assert!(dict.len() == values.len());

    dict.clear();
    assert!(dict.is_empty());
    assert!(dict.len() == 0);
    assert!(dict.iter().next().is_none());

    for value in &values {
        assert!(dict.insert(*value, String::from("bar")).is_none());
    }
    assert!(!dict.is_empty());
    assert!(dict.len() == values.len());
    dict.check_consistency();
}

#[test]
fn test_remove() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut dict = AvlDictionary::new();
    for value in &values {
        dict.insert(*value, 42);
    }

    values.shuffle(&mut rng);
    for value in &values {
        assert!(dict.search(value).is_some());
        assert_eq!(dict.remove(value), Some(42));
        assert!(dict.search(value).is_none());
        dict.check_consistency();
    }
    assert!(dict.is_empty());
    assert!(dict.len() == 0);
    assert_eq!(dict.height(), None);
}

#[test]
fn test_remove_cases() {
    //       4
    //     /   \
    //    2     6
    //   / \     \
    //  1   3     7
    let build = || {
        let mut dict = AvlDictionary::new();
        for key in [4, 2, 6, 1, 3, 7] {
            dict.insert(key, key * 10);
        }
        dict.check_consistency();
        dict
    };

    // Leaf
    let mut dict = build();
    assert_eq!(dict.remove(&1), Some(10));
    dict.check_consistency();
    assert_eq!(dict.len(), 5);

    // One child
    let mut dict = build();
    assert_eq!(dict.remove(&6), Some(60));
    dict.check_consistency();
    assert_eq!(dict.len(), 5);
    assert_eq!(dict.search(&7), Some(&70));

    // Two children, successor is the right child
    let mut dict = build();
    assert_eq!(dict.remove(&2), Some(20));
    dict.check_consistency();
    assert_eq!(dict.len(), 5);
    assert_eq!(dict.search(&3), Some(&30));

    // Two children at the root, successor deeper in the right subtree
    let mut dict = build();
    dict.insert(5, 50);
    assert_eq!(dict.remove(&4), Some(40));
    dict.check_consistency();
    assert_eq!(dict.len(), 6);
    assert_eq!(dict.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 5, 6, 7]);

    // Absent key
    let mut dict = build();
    let before = dict.pretty().to_string();
    assert_eq!(dict.remove(&5), None);
    assert_eq!(dict.len(), 6);
    assert_eq!(dict.pretty().to_string(), before);
}

#[test]
fn test_iter() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut dict = AvlDictionary::new();
    for value in &values {
        dict.insert(*value, value.wrapping_add(42));
    }

    values.sort();
    values.dedup();

    let mut dict_iter = dict.iter();
    assert_eq!(dict_iter.len(), values.len());
    for value in &values {
        let kv = dict_iter.next();
        assert!(kv.is_some());
        let (&key, &mapped) = kv.unwrap();
        assert_eq!(key, *value);
        assert_eq!(mapped, value.wrapping_add(42));
    }
    assert!(dict_iter.next().is_none());
    assert!(dict_iter.next().is_none());

    let mut value_iter = values.iter();
    for (&key, &mapped) in &dict {
        let value = value_iter.next();
        assert!(value.is_some());
        let value = value.unwrap();
        assert_eq!(key, *value);
        assert_eq!(mapped, value.wrapping_add(42));
    }
    assert!(value_iter.next().is_none());

    let mut dict_iter_mut = dict.iter_mut();
    for value in &values {
        let kv = dict_iter_mut.next();
        assert!(kv.is_some());
        let (&key, mapped_mut) = kv.unwrap();
        assert_eq!(key, *value);
        assert_eq!(*mapped_mut, value.wrapping_add(42));
        *mapped_mut = value.wrapping_sub(42);
    }
    assert!(dict_iter_mut.next().is_none());

    let mut value_iter = values.iter();
    for (&key, mapped_mut) in &mut dict {
        let value = value_iter.next();
        assert!(value.is_some());
        let value = value.unwrap();
        assert_eq!(key, *value);
        assert_eq!(*mapped_mut, value.wrapping_sub(42));
        *mapped_mut = 42;
    }
    assert!(value_iter.next().is_none());

    assert!(dict.values().all(|&mapped| mapped == 42));
    assert_eq!(dict.keys().copied().collect::<Vec<_>>(), values);
}

#[test]
fn test_iter_empty() {
    let dict = AvlDictionary::<i32, i32>::new();
    let mut iter = dict.iter();
    assert_eq!(iter.len(), 0);
    assert!(iter.next().is_none());
}

#[test]
fn test_comparator() {
    let mut dict = AvlDictionary::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    for key in 0..N {
        dict.insert(key, ());
        dict.check_consistency();
    }
    let keys: Vec<i32> = dict.keys().copied().collect();
    let expected: Vec<i32> = (0..N).rev().collect();
    assert_eq!(keys, expected);

    let mut dict = AvlDictionary::with_comparator(|a: &String, b: &String| {
        a.to_lowercase().cmp(&b.to_lowercase())
    });
    dict.insert(String::from("Beta"), 1);
    dict.insert(String::from("alpha"), 2);
    assert_eq!(dict.insert(String::from("BETA"), 3), Some(1));
    assert_eq!(dict.len(), 2);
    assert_eq!(
        dict.keys().map(String::as_str).collect::<Vec<_>>(),
        ["alpha", "Beta"]
    );
}

#[test]
fn test_partial_order() {
    let mut dict = AvlDictionary::with_comparator(PartialOrder);
    for key in [0.5, -1.0, 2.25, 1.0] {
        assert_eq!(dict.try_insert(key, key.to_string()), Ok(None));
    }
    let before = dict.pretty().to_string();

    assert_eq!(dict.try_insert(f64::NAN, String::new()), Err(Error::UnorderedKey));
    assert_eq!(dict.try_search(&f64::NAN), Err(Error::UnorderedKey));
    assert_eq!(dict.try_remove(&f64::NAN), Err(Error::UnorderedKey));
    assert_eq!(dict.len(), 4);
    assert_eq!(dict.pretty().to_string(), before);
    dict.check_consistency();

    assert_eq!(dict.try_search(&2.25), Ok(Some(&String::from("2.25"))));
    assert_eq!(dict.try_remove(&-1.0), Ok(Some(String::from("-1"))));
    assert_eq!(dict.try_remove(&-1.0), Ok(None));
}

#[test]
fn test_incomparable_stored_key() {
    // Orders only keys of equal parity.
    let parity = |a: &i32, b: &i32| -> Option<Ordering> {
        if a % 2 == b % 2 {
            Some(a.cmp(b))
        } else {
            None
        }
    };

    struct Parity<F>(F);
    impl<F: Fn(&i32, &i32) -> Option<Ordering>> Compare<i32> for Parity<F> {
        fn compare(&self, lhs: &i32, rhs: &i32) -> Option<Ordering> {
            (self.0)(lhs, rhs)
        }
    }

    let mut dict = AvlDictionary::with_comparator(Parity(parity));
    assert_eq!(dict.try_insert(2, "two"), Ok(None));
    assert_eq!(dict.try_insert(3, "three"), Err(Error::IncomparableKeys));
    assert_eq!(dict.try_remove(&3), Err(Error::IncomparableKeys));
    assert_eq!(dict.len(), 1);
    dict.check_consistency();
}

#[test]
#[should_panic(expected = "key is not ordered with respect to itself")]
fn test_insert_unordered_key_panics() {
    let mut dict = AvlDictionary::with_comparator(PartialOrder);
    dict.insert(f32::NAN, ());
}

#[test]
fn test_pretty() {
    let mut dict = AvlDictionary::new();
    for (key, value) in [(5, "e"), (3, "c"), (8, "h"), (1, "a")] {
        dict.insert(key, value);
    }
    let expected = "\
5 e
|__3 c ^5
   |__1 a ^3
   |__#
|__8 h ^5
";
    assert_eq!(dict.pretty().to_string(), expected);
    assert_eq!(AvlDictionary::<i32, i32>::new().pretty().to_string(), "");
}

#[test]
fn test_clone_and_debug() {
    let dict: AvlDictionary<_, _> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
    let mut copy = dict.clone();
    copy.check_consistency();
    copy.insert(4, 'd');
    copy.check_consistency();
    assert_eq!(dict.len(), 3);
    assert_eq!(copy.len(), 4);
    assert_eq!(format!("{dict:?}"), "{1: 'a', 2: 'b', 3: 'c'}");
}

#[test]
#[ignore]
fn test_large() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..LARGE_N).map(|_| rng.gen_range(0..LARGE_N)).collect();

    let mut dict = AvlDictionary::new();
    for value in &values {
        dict.insert(*value, *value);
    }
    dict.check_consistency();

    values.shuffle(&mut rng);
    values.resize(values.len() / 2, 0);
    for value in &values {
        dict.remove(value);
    }
    dict.check_consistency();
}
