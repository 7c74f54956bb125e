use std::{
    env, fs,
    io::{self, Write},
    process,
    sync::{Arc, Mutex},
};

use env_logger::{Target, WriteStyle};
use house_price::{Artifacts, PredictionRequest, predict};
use log::LevelFilter;
use model::LinearRegression;
use ndarray::arr1;
use serde_json::json;

/// Log sink shared between the logger and the test.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// The logger is process wide, so this file holds a single test.
#[test]
fn structured_fields_reach_the_log_output() {
    let captured = Captured::default();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(captured.clone())))
        .init();

    let dir = env::temp_dir().join(format!("house-price-{}-logging", process::id()));
    fs::create_dir_all(&dir).unwrap();
    let model_path = dir.join("model.safetensors");
    let columns_path = dir.join("columns.json");
    let model = LinearRegression::new(arr1(&[0.1, 2.0, 3.0, 40.0, 15.0]), 5.0).with_estimator("ridge");
    fs::write(&model_path, model.to_safetensors().unwrap()).unwrap();
    fs::write(
        &columns_path,
        json!({ "data_columns": ["total_sqft", "bath", "bhk", "hebbal", "whitefield"] }).to_string(),
    )
    .unwrap();

    let loaded = Artifacts::load(&model_path, &columns_path);
    fs::remove_dir_all(&dir).unwrap();
    let artifacts = loaded.unwrap();

    let request = PredictionRequest {
        location: "whitefield".into(),
        total_sqft: 1000.0,
        bath: 2,
        bhk: 2,
    };
    let response = predict(&artifacts, &request).unwrap();
    assert_eq!(response.price, 130.0);

    let output = captured.text();
    assert!(output.contains("artifacts loaded"), "{output}");
    assert!(output.contains("estimator=ridge"), "{output}");
    assert!(output.contains("columns=5"), "{output}");
    assert!(output.contains("locations=2"), "{output}");

    assert!(output.contains("predicted price"), "{output}");
    assert!(output.contains("location=whitefield"), "{output}");
    assert!(output.contains("known_location=true"), "{output}");
    assert!(output.contains("price=130"), "{output}");
}
