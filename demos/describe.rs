//! Run with `cargo run --example describe`.

use imprint::{testing, Cache, Primitive, Record, Traced, Value};

fn main() {
    let mut image = Image::new(20, 40);
    let cache = Cache::new();

    // [Miss] This executes the closure as the cache is thus far empty.
    describe(&cache, &image);

    // [Hit] Everything stayed the same.
    describe(&cache, &image);

    image.resize(80, 30);

    // [Miss] The image's width and height are different.
    describe(&cache, &image);

    image.resize(80, 70);
    image.pixels.fill(255);

    // [Hit] The last call only read the width and it stayed the same.
    describe(&cache, &image);
}

/// Format the image's size humanly readable.
fn describe(cache: &Cache<&'static str>, image: &Image) -> &'static str {
    let record = image.record();
    let output = cache
        .query("describe", Value::Obj(&record), |view| {
            let big = |key| match view.get(key) {
                Some(Traced::Prim(Primitive::Int(v))) => v > 50,
                _ => false,
            };
            if big("width") || big("height") {
                "The image is big!"
            } else {
                "The image is small!"
            }
        })
        .unwrap();

    let label = if testing::last_was_hit() { "[hit] " } else { "[miss]" };
    println!("describe {label} {output}");

    output
}

/// A raster image.
struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        // Resize the actual image ...
    }

    /// The image's reflectable face.
    ///
    /// A host type with a fixed shape would usually implement `Reflect`
    /// directly; building a record is the quick way out for a demo.
    fn record(&self) -> Record {
        let mut record = Record::new();
        record.set("width", self.width as i64);
        record.set("height", self.height as i64);
        record.set("pixels", self.pixels.iter().map(|&p| p as i64).sum::<i64>());
        record
    }
}
