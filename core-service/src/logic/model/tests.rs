//! Integration Tests for ONNX Inference
//!
//! Builds tiny linear ONNX graphs (`input · weight + bias`) on the fly and
//! runs them through `OnnxEngine`.

#[cfg(test)]
mod integration_tests {
    use std::path::{Path, PathBuf};

    use prost::Message;

    use crate::logic::features::layout::FEATURE_COUNT;
    use crate::logic::model::inference::{load_engine, EngineKind, InferenceEngine, InferenceError, OnnxEngine};

    // ------------------------------------------------------------------------
    // Minimal subset of onnx.proto
    // ------------------------------------------------------------------------

    #[derive(Clone, PartialEq, Message)]
    struct ModelProto {
        #[prost(int64, tag = "1")]
        ir_version: i64,
        #[prost(string, tag = "2")]
        producer_name: String,
        #[prost(message, optional, tag = "7")]
        graph: Option<GraphProto>,
        #[prost(message, repeated, tag = "8")]
        opset_import: Vec<OperatorSetIdProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    struct OperatorSetIdProto {
        #[prost(string, tag = "1")]
        domain: String,
        #[prost(int64, tag = "2")]
        version: i64,
    }

    #[derive(Clone, PartialEq, Message)]
    struct GraphProto {
        #[prost(message, repeated, tag = "1")]
        node: Vec<NodeProto>,
        #[prost(string, tag = "2")]
        name: String,
        #[prost(message, repeated, tag = "5")]
        initializer: Vec<TensorProto>,
        #[prost(message, repeated, tag = "11")]
        input: Vec<ValueInfoProto>,
        #[prost(message, repeated, tag = "12")]
        output: Vec<ValueInfoProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    struct NodeProto {
        #[prost(string, repeated, tag = "1")]
        input: Vec<String>,
        #[prost(string, repeated, tag = "2")]
        output: Vec<String>,
        #[prost(string, tag = "4")]
        op_type: String,
    }

    #[derive(Clone, PartialEq, Message)]
    struct TensorProto {
        #[prost(int64, repeated, tag = "1")]
        dims: Vec<i64>,
        #[prost(int32, tag = "2")]
        data_type: i32,
        #[prost(string, tag = "8")]
        name: String,
        #[prost(bytes = "vec", tag = "9")]
        raw_data: Vec<u8>,
    }

    #[derive(Clone, PartialEq, Message)]
    struct ValueInfoProto {
        #[prost(string, tag = "1")]
        name: String,
        #[prost(message, optional, tag = "2")]
        r#type: Option<TypeProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    struct TypeProto {
        #[prost(message, optional, tag = "1")]
        tensor_type: Option<TensorTypeProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    struct TensorTypeProto {
        #[prost(int32, tag = "1")]
        elem_type: i32,
        #[prost(message, optional, tag = "2")]
        shape: Option<TensorShapeProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    struct TensorShapeProto {
        #[prost(message, repeated, tag = "1")]
        dim: Vec<DimensionProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    struct DimensionProto {
        #[prost(int64, tag = "1")]
        dim_value: i64,
    }

    const FLOAT: i32 = 1;

    fn float_info(name: &str, dims: &[i64]) -> ValueInfoProto {
        ValueInfoProto {
            name: name.to_string(),
            r#type: Some(TypeProto {
                tensor_type: Some(TensorTypeProto {
                    elem_type: FLOAT,
                    shape: Some(TensorShapeProto {
                        dim: dims.iter().map(|&d| DimensionProto { dim_value: d }).collect(),
                    }),
                }),
            }),
        }
    }

    fn float_tensor(name: &str, dims: &[i64], values: &[f32]) -> TensorProto {
        TensorProto {
            dims: dims.to_vec(),
            data_type: FLOAT,
            name: name.to_string(),
            raw_data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn node(op_type: &str, inputs: &[&str], output: &str) -> NodeProto {
        NodeProto {
            input: inputs.iter().map(|s| s.to_string()).collect(),
            output: vec![output.to_string()],
            op_type: op_type.to_string(),
        }
    }

    /// `output[1,1] = input[1,width] · weights[width,1] + bias`
    fn linear_model_bytes(weights: &[f32], bias: f32) -> Vec<u8> {
        let width = weights.len() as i64;
        let graph = GraphProto {
            node: vec![
                node("MatMul", &["input", "weight"], "product"),
                node("Add", &["product", "bias"], "output"),
            ],
            name: "housing_linear".to_string(),
            initializer: vec![
                float_tensor("weight", &[width, 1], weights),
                float_tensor("bias", &[1], &[bias]),
            ],
            input: vec![float_info("input", &[1, width])],
            output: vec![float_info("output", &[1, 1])],
        };

        ModelProto {
            ir_version: 8,
            producer_name: "housing-core-tests".to_string(),
            graph: Some(graph),
            opset_import: vec![OperatorSetIdProto { domain: String::new(), version: 13 }],
        }
        .encode_to_vec()
    }

    fn write_model(dir: &Path, weights: &[f32], bias: f32) -> PathBuf {
        let path = dir.join("boston_model.onnx");
        std::fs::write(&path, linear_model_bytes(weights, bias)).unwrap();
        path
    }

    fn weights() -> Vec<f32> {
        (0..FEATURE_COUNT).map(|i| (i + 1) as f32 * 0.5).collect()
    }

    // ------------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_onnx_model_loads_and_predicts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_model(dir.path(), &weights(), 22.5);

        let engine = OnnxEngine::load(&path).unwrap();
        assert_eq!(engine.kind(), EngineKind::Onnx);
        assert_eq!(engine.input_width(), FEATURE_COUNT);

        // Zero row yields the bias
        assert!((engine.predict(&[0.0; FEATURE_COUNT]).unwrap() - 22.5).abs() < 1e-5);

        // One unit on feature i adds weight i, so order is checked too
        for i in 0..FEATURE_COUNT {
            let mut row = [0.0; FEATURE_COUNT];
            row[i] = 1.0;
            let expected = 22.5 + (i + 1) as f64 * 0.5;
            let value = engine.predict(&row).unwrap();
            assert!((value - expected).abs() < 1e-4, "feature {}: {} != {}", i, value, expected);
        }
    }

    #[test]
    fn test_onnx_predictions_are_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let engine = OnnxEngine::load(&write_model(dir.path(), &weights(), 1.0)).unwrap();

        let row: Vec<f64> = (0..FEATURE_COUNT).map(|i| i as f64 * -0.3).collect();
        let first = engine.predict(&row).unwrap();
        for _ in 0..5 {
            assert_eq!(engine.predict(&row).unwrap(), first);
        }
    }

    #[test]
    fn test_onnx_model_for_other_width_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let narrow = vec![1.0; FEATURE_COUNT - 1];
        let path = write_model(dir.path(), &narrow, 0.0);

        match OnnxEngine::load(&path) {
            Err(InferenceError::InvalidArtifact(msg)) => assert!(msg.contains("13-feature row"), "{}", msg),
            Err(other) => panic!("Expected InvalidArtifact, got {}", other),
            Ok(_) => panic!("12-wide model must not load"),
        }
    }

    #[test]
    fn test_corrupt_onnx_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boston_model.onnx");
        std::fs::write(&path, b"not a model").unwrap();

        assert!(matches!(OnnxEngine::load(&path), Err(InferenceError::InvalidArtifact(_))));
    }

    #[test]
    fn test_load_engine_dispatches_onnx() {
        let dir = tempfile::tempdir().unwrap();
        let engine = load_engine(&write_model(dir.path(), &weights(), 0.0)).unwrap();
        assert_eq!(engine.kind(), EngineKind::Onnx);
    }
}
