use avl_dictionary::{AvlDictionary, PartialOrder};

fn main() {
    let mut dict = AvlDictionary::new();
    for (key, value) in [(5, "e"), (3, "c"), (8, "h"), (1, "a"), (4, "d")] {
        dict.insert(key, value);
    }
    assert_eq!(dict.search(&3), Some(&"c"));
    assert_eq!(dict.insert(3, "C"), Some("c"));

    println!("Tree:");
    print!("{}", dict.pretty());

    dict.remove(&5);
    assert!(dict.search(&5).is_none());

    for (k, v) in &dict {
        println!("{k} => {v}");
    }

    let mut prices = AvlDictionary::with_comparator(PartialOrder);
    prices.insert(2.5, "tea");
    prices.insert(0.99, "gum");
    if let Err(err) = prices.try_insert(f64::NAN, "void") {
        println!("rejected: {err}");
    }
    println!("{prices:?}");
}
