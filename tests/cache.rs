use imprint::{testing, Cache, Error, Primitive, Record, Traced, Value, View};

macro_rules! test {
    (miss: $call:expr, $result:expr) => {{
        assert_eq!($call, $result);
        assert!(!testing::last_was_hit());
    }};
    (hit: $call:expr, $result:expr) => {{
        assert_eq!($call, $result);
        assert!(testing::last_was_hit());
    }};
}

fn int(view: &View, key: &str) -> i64 {
    match view.get(key) {
        Some(Traced::Prim(Primitive::Int(value))) => value,
        _ => 0,
    }
}

fn image(width: i64, height: i64, pixels: i64) -> Record {
    let mut image = Record::new();
    image.set("width", width);
    image.set("height", height);
    image.set("pixels", pixels);
    image
}

fn describe(cache: &Cache<&'static str>, image: &Record) -> &'static str {
    cache
        .query("describe", Value::Obj(image), |view| {
            if int(&view, "width") > 50 || int(&view, "height") > 50 {
                "The image is big!"
            } else {
                "The image is small!"
            }
        })
        .unwrap()
}

#[test]
fn test_basic() {
    let cache = Cache::new();

    // This executes the closure as the cache is thus far empty.
    test!(miss: describe(&cache, &image(20, 40, 800)), "The image is small!");

    // Everything stayed the same.
    test!(hit: describe(&cache, &image(20, 40, 800)), "The image is small!");

    // The width and height are different.
    test!(miss: describe(&cache, &image(80, 30, 2400)), "The image is big!");

    // The original call never read the pixels, so the changed pixel data
    // still hits.
    test!(hit: describe(&cache, &image(20, 40, 999)), "The image is small!");
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_short_circuit_keeps_the_footprint_small() {
    let cache = Cache::new();

    // width > 50 short-circuits, so height is outside the footprint of
    // this entry and may change freely.
    test!(miss: describe(&cache, &image(80, 30, 0)), "The image is big!");
    test!(hit: describe(&cache, &image(80, 31, 0)), "The image is big!");
    test!(hit: describe(&cache, &image(80, 99, 0)), "The image is big!");
}

#[test]
fn test_distinct_keys_do_not_share_entries() {
    let cache = Cache::new();
    let record = image(20, 40, 0);

    let run = |key: &'static str| {
        cache
            .query(key, Value::Obj(&record), |view| int(&view, "width"))
            .unwrap()
    };

    test!(miss: run("first"), 20);
    test!(hit: run("first"), 20);
    test!(miss: run("second"), 20);
    test!(hit: run("second"), 20);
}

#[test]
fn test_existence_probes_hit_and_miss() {
    let cache = Cache::new();

    let probe = |record: &Record| {
        cache
            .query((), Value::Obj(record), |view| view.has("alpha"))
            .unwrap()
    };

    let mut record = Record::new();
    record.set("beta", 1);
    test!(miss: probe(&record), false);
    test!(hit: probe(&record), false);

    // The probe's answer flips, so the entry no longer applies.
    record.set("alpha", 1);
    test!(miss: probe(&record), true);
}

#[test]
fn test_eviction_ages_entries() {
    let cache = Cache::new();

    test!(miss: describe(&cache, &image(20, 40, 0)), "The image is small!");
    test!(miss: describe(&cache, &image(80, 40, 0)), "The image is big!");
    assert_eq!(cache.len(), 2);

    // Touch only the small image, then evict everything that has been
    // unused for two sweeps.
    cache.evict(2);
    test!(hit: describe(&cache, &image(20, 40, 0)), "The image is small!");
    cache.evict(2);
    cache.evict(2);

    assert_eq!(cache.len(), 1);
    test!(hit: describe(&cache, &image(20, 40, 0)), "The image is small!");
    test!(miss: describe(&cache, &image(80, 40, 0)), "The image is big!");
}

#[test]
fn test_evict_zero_clears() {
    let cache = Cache::new();
    test!(miss: describe(&cache, &image(20, 40, 0)), "The image is small!");
    cache.evict(0);
    assert!(cache.is_empty());
    test!(miss: describe(&cache, &image(20, 40, 0)), "The image is small!");
}

#[test]
fn test_primitive_targets_error() {
    let cache: Cache<i64> = Cache::new();
    let result = cache.query((), Value::Prim(Primitive::Int(3)), |_| 0);
    assert_eq!(result, Err(Error::InvalidTarget(Primitive::Int(3))));
}

#[test]
fn test_counters_observe_the_sequence() {
    testing::reset();
    let cache = Cache::new();
    describe(&cache, &image(20, 40, 0));
    describe(&cache, &image(20, 40, 0));
    describe(&cache, &image(90, 40, 0));
    assert_eq!(testing::hits(), 1);
    assert_eq!(testing::misses(), 2);
}

#[test]
fn test_nested_footprints() {
    let cache = Cache::new();

    let area = |doc: &Record| {
        cache
            .query("area", Value::Obj(doc), |view| {
                let page = view.get("page").unwrap().into_view().unwrap();
                int(&page, "width") * int(&page, "height")
            })
            .unwrap()
    };

    let doc = |width: i64, margin: i64| {
        let mut page = Record::new();
        page.set("width", width);
        page.set("height", 20);
        page.set("margin", margin);
        let mut doc = Record::new();
        doc.set("page", page);
        doc.set("title", "hello");
        doc
    };

    test!(miss: area(&doc(10, 2)), 200);
    // Margin and title are outside the footprint.
    test!(hit: area(&doc(10, 7)), 200);
    test!(miss: area(&doc(30, 2)), 600);
}
