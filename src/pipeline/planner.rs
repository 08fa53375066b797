// In: src/pipeline/planner.rs

//! The empirical pipeline planner.
//!
//! Pipeline choice is normally the caller's decision; this module is an optional
//! helper for callers that do not want to make it. It operates by:
//! 1. Generating a small set of valid candidate pipelines for the column's kind.
//! 2. Trial-encoding every candidate on the column itself.
//! 3. Returning the candidate with the smallest payload (ties go to the earlier,
//!    simpler candidate).
//!
//! The planner only ever produces ordinary pipelines, so its output decodes with
//! the plain decoder and carries no planner-specific metadata.

use std::time::Instant;

use crate::config::{CodecConfig, PlanningProfile};
use crate::error::CodecError;
use crate::kernels::{self, fixed_point, integer_packing};
use crate::log_metric;
use crate::pipeline::builder::Pipeline;
use crate::pipeline::executor;
use crate::pipeline::models::{EncodedColumn, Stage, Step};
use crate::types::TypedArray;

//==================================================================================
// 1. Candidate Generation
//==================================================================================

/// Candidate step lists for an integer column, simplest first.
fn integer_candidates(profile: PlanningProfile) -> Vec<Vec<Step>> {
    let mut candidates = vec![
        vec![Step::byte_array()],
        vec![Step::integer_packing(), Step::byte_array()],
        vec![Step::delta(), Step::integer_packing(), Step::byte_array()],
    ];
    if profile == PlanningProfile::Fast {
        return candidates;
    }
    candidates.push(vec![
        Step::run_length(),
        Step::integer_packing(),
        Step::byte_array(),
    ]);
    candidates.push(vec![
        Step::delta(),
        Step::run_length(),
        Step::integer_packing(),
        Step::byte_array(),
    ]);
    if profile == PlanningProfile::Exhaustive {
        candidates.push(vec![Step::run_length(), Step::byte_array()]);
        candidates.push(vec![Step::delta(), Step::run_length(), Step::byte_array()]);
    }
    candidates
}

//==================================================================================
// 2. Empirical Scoring
//==================================================================================

/// Trial-encodes every candidate and returns the smallest with its payload size.
fn find_best_steps_by_trial(
    array: &TypedArray,
    candidates: Vec<Vec<Step>>,
) -> Result<(Vec<Step>, usize), CodecError> {
    let start_overall = Instant::now();
    log::info!(
        "--- planner: scoring {} candidates for {} {} values ---",
        candidates.len(),
        array.len(),
        array.type_name()
    );

    let mut best: Option<(Vec<Step>, usize)> = None;
    for steps in candidates {
        let start_candidate = Instant::now();
        let label = describe_steps(&steps);
        match trial_encode(array, &steps) {
            Ok(Some(size)) => {
                log::info!(
                    "  - Candidate: {:<50} | Score (Size): {} | Time: {:.2?}",
                    label,
                    size,
                    start_candidate.elapsed()
                );
                log_metric!("event"="plan_candidate", "steps"=&label, "bytes"=size);
                if best.as_ref().map_or(true, |(_, best_size)| size < *best_size) {
                    best = Some((steps, size));
                }
            }
            Ok(None) => {
                log::info!("  - Candidate: {:<50} | SKIPPED: packing would expand", label);
            }
            Err(e) => {
                log::info!("  - Candidate: {:<50} | FAILED: {}", label, e);
            }
        }
    }

    log::info!(
        "--- planner: scoring took {:.2?} ---",
        start_overall.elapsed()
    );
    best.ok_or_else(|| {
        CodecError::InvalidInput("no candidate pipeline could encode the column".into())
    })
}

/// Runs `steps` over `array` and returns the payload size.
///
/// Returns `Ok(None)` without running Integer Packing when the packed stream
/// would be larger than its input. Packing cost grows with value magnitude, so
/// a wide-valued column could otherwise expand by orders of magnitude.
fn trial_encode(array: &TypedArray, steps: &[Step]) -> Result<Option<usize>, CodecError> {
    let mut current: Option<TypedArray> = None;
    for step in steps {
        let input = current.as_ref().unwrap_or(array);
        if let Step::IntegerPacking { byte_width } = step {
            if packing_would_expand(input, *byte_width)? {
                return Ok(None);
            }
        }
        match kernels::dispatch_encode(step, input)?.0 {
            Stage::Values(next) => current = Some(next),
            Stage::Bytes(bytes) => return Ok(Some(bytes.len())),
        }
    }
    Err(CodecError::InvalidChain(
        "candidate does not end in a terminal step".to_string(),
    ))
}

/// Whether packing `input` takes more bytes than storing it unpacked.
fn packing_would_expand(input: &TypedArray, byte_width: Option<u8>) -> Result<bool, CodecError> {
    let (Some(element_type), Some(values)) = (input.element_type(), input.to_i64_vec()) else {
        return Ok(false);
    };
    let layout = integer_packing::choose_layout(&values, byte_width)?;
    let packed_bytes =
        integer_packing::packed_len(&values, layout).saturating_mul(layout.byte_width as usize);
    Ok(packed_bytes > values.len() * element_type.byte_width())
}

fn describe_steps(steps: &[Step]) -> String {
    steps
        .iter()
        .map(Step::kind_name)
        .collect::<Vec<_>>()
        .join(" > ")
}

//==================================================================================
// 3. Float Precision Inference
//==================================================================================

/// Finds the smallest `d <= max_digits` for which quantizing with `10^d` keeps
/// every value within tolerance and inside the `i32` range.
///
/// The tolerance is relative to the source precision: `1e-6 * max(1, |x|)` for
/// `f32` sources and `1e-9 * max(1, |x|)` for `f64` sources.
fn infer_decimal_digits(values: &[f64], single_precision: bool, max_digits: u8) -> Option<u8> {
    if values.iter().any(|x| !x.is_finite()) {
        return None;
    }
    let rel_tol = if single_precision { 1e-6 } else { 1e-9 };

    (0..=max_digits).find(|&digits| {
        let factor = 10f64.powi(digits as i32);
        values.iter().all(|&x| {
            let scaled = (x * factor).round();
            scaled >= i32::MIN as f64
                && scaled <= i32::MAX as f64
                && (scaled / factor - x).abs() <= rel_tol * x.abs().max(1.0)
        })
    })
}

fn plan_float_steps(array: &TypedArray, config: &CodecConfig) -> Result<Vec<Step>, CodecError> {
    let (values, single_precision): (Vec<f64>, bool) = match array {
        TypedArray::Float32(v) => (v.iter().map(|&x| x as f64).collect(), true),
        TypedArray::Float64(v) => (v.clone(), false),
        other => {
            return Err(CodecError::InvalidInput(format!(
                "float planning requires a float column, got {}",
                other.type_name()
            )))
        }
    };
    let raw = vec![Step::byte_array()];

    let digits = infer_decimal_digits(&values, single_precision, config.max_float_digits);
    let Some(digits) = digits else {
        log::info!("planner: no fixed-point precision fits, storing floats raw");
        return Ok(raw);
    };
    let factor = 10f64.powi(digits as i32);
    let quantized = TypedArray::Int32(fixed_point::encode(&values, factor)?);
    let (tail, tail_size) =
        find_best_steps_by_trial(&quantized, integer_candidates(config.profile))?;

    let raw_size = array.len() * array.element_type().map_or(0, |t| t.byte_width());
    if tail_size >= raw_size {
        return Ok(raw);
    }
    log_metric!("event"="plan_float", "digits"=digits, "factor"=factor);

    let mut steps = vec![Step::fixed_point(factor)];
    steps.extend(tail);
    Ok(steps)
}

fn plan_string_step(values: &[String], config: &CodecConfig) -> Result<Step, CodecError> {
    if let Some(index_steps) = &config.string_index_pipeline {
        return Ok(Step::StringArray {
            index_pipeline: Some(index_steps.clone()),
        });
    }
    let (_, indices) = crate::kernels::string_array::build_dictionary(values)?;
    let (index_steps, _) = find_best_steps_by_trial(
        &TypedArray::Int32(indices),
        integer_candidates(config.profile),
    )?;
    Ok(Step::StringArray {
        index_pipeline: Some(index_steps),
    })
}

//==================================================================================
// 4. Top-Level Public API
//==================================================================================

/// Chooses a pipeline for `array` by trial-encoding candidates.
pub fn plan_column(array: &TypedArray, config: &CodecConfig) -> Result<Pipeline, CodecError> {
    let kind = array.value_kind();
    let steps = match array {
        TypedArray::Utf8(values) if values.is_empty() => vec![Step::string_array()],
        TypedArray::Utf8(values) => vec![plan_string_step(values, config)?],
        _ if array.is_empty() => vec![Step::byte_array()],
        TypedArray::Float32(_) | TypedArray::Float64(_) => plan_float_steps(array, config)?,
        _ => find_best_steps_by_trial(array, integer_candidates(config.profile))?.0,
    };

    let pipeline = Pipeline::from_steps(kind, steps)?;
    log::info!(
        "planner: chose [{}] for {} {} values",
        pipeline.describe(),
        array.len(),
        array.type_name()
    );
    Ok(pipeline)
}

/// Plans a pipeline for `array` and encodes it in one call.
pub fn encode_auto(array: &TypedArray, config: &CodecConfig) -> Result<EncodedColumn, CodecError> {
    let pipeline = plan_column(array, config)?;
    executor::encode(array, &pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::executor::decode;
    use crate::types::ValueKind;

    #[test]
    fn test_profiles_control_candidate_count() {
        assert_eq!(integer_candidates(PlanningProfile::Fast).len(), 3);
        assert_eq!(integer_candidates(PlanningProfile::Balanced).len(), 5);
        assert_eq!(integer_candidates(PlanningProfile::Exhaustive).len(), 7);
        for steps in integer_candidates(PlanningProfile::Exhaustive) {
            assert!(Pipeline::from_steps(ValueKind::Integer, steps).is_ok());
        }
    }

    #[test]
    fn test_constant_column_prefers_run_length() {
        let array = TypedArray::Int32(vec![7; 10_000]);
        let pipeline = plan_column(&array, &CodecConfig::default()).unwrap();
        assert!(pipeline.steps().contains(&Step::run_length()));

        let column = encode_auto(&array, &CodecConfig::default()).unwrap();
        assert!(column.data.len() < 16);
        assert_eq!(decode(&column).unwrap(), array);
    }

    #[test]
    fn test_sequential_ids_prefer_delta() {
        let array = TypedArray::Int32((1_000_000..1_010_000).collect());
        let config = CodecConfig {
            profile: PlanningProfile::Fast,
            ..CodecConfig::default()
        };
        let pipeline = plan_column(&array, &config).unwrap();
        assert_eq!(pipeline.steps()[0], Step::delta());
        assert_eq!(
            decode(&encode_auto(&array, &config).unwrap()).unwrap(),
            array
        );
    }

    fn hash_like_ids(n: usize) -> Vec<i32> {
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                ((state >> 33) % 2_000_000_000) as i32
            })
            .collect()
    }

    #[test]
    fn test_wide_values_skip_integer_packing() {
        let array = TypedArray::Int32(hash_like_ids(20_000));
        for profile in [
            PlanningProfile::Fast,
            PlanningProfile::Balanced,
            PlanningProfile::Exhaustive,
        ] {
            let config = CodecConfig {
                profile,
                ..CodecConfig::default()
            };
            let pipeline = plan_column(&array, &config).unwrap();
            assert!(!pipeline
                .steps()
                .iter()
                .any(|s| matches!(s, Step::IntegerPacking { .. })));

            let column = encode_auto(&array, &config).unwrap();
            assert!(column.data.len() <= 4 * array.len());
            assert_eq!(decode(&column).unwrap(), array);
        }
    }

    #[test]
    fn test_packing_expansion_check() {
        let wide = TypedArray::Int32(vec![1_500_000_000, 7]);
        assert!(packing_would_expand(&wide, None).unwrap());
        assert_eq!(
            trial_encode(&wide, &[Step::integer_packing(), Step::byte_array()]).unwrap(),
            None
        );

        let small = TypedArray::Int32(vec![3, -7, 100]);
        assert!(!packing_would_expand(&small, None).unwrap());
        assert_eq!(
            trial_encode(&small, &[Step::integer_packing(), Step::byte_array()]).unwrap(),
            Some(3)
        );
    }

    #[test]
    fn test_digit_inference() {
        assert_eq!(infer_decimal_digits(&[1.5, 2.25], false, 4), Some(2));
        assert_eq!(infer_decimal_digits(&[3.0, -4.0], false, 4), Some(0));
        assert_eq!(infer_decimal_digits(&[0.123456], false, 4), None);
        assert_eq!(infer_decimal_digits(&[f64::NAN], false, 4), None);
        assert_eq!(infer_decimal_digits(&[3.0e10], false, 4), None);
        assert_eq!(infer_decimal_digits(&[0.1f32 as f64], true, 4), Some(1));
    }

    #[test]
    fn test_coordinates_use_fixed_point_within_tolerance() {
        let values: Vec<f64> = (0..1000).map(|i| 10.0 + (i % 37) as f64 * 0.125).collect();
        let array = TypedArray::Float64(values.clone());
        let pipeline = plan_column(&array, &CodecConfig::default()).unwrap();
        assert_eq!(pipeline.steps()[0], Step::fixed_point(1000.0));

        let TypedArray::Float64(decoded) = decode(&pipeline.encode(&array).unwrap()).unwrap() else {
            panic!("expected Float64");
        };
        for (a, b) in values.iter().zip(&decoded) {
            assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0));
        }
    }

    #[test]
    fn test_imprecise_floats_stay_raw() {
        let array = TypedArray::Float64(vec![std::f64::consts::PI, std::f64::consts::E]);
        let pipeline = plan_column(&array, &CodecConfig::default()).unwrap();
        assert_eq!(pipeline.steps(), &[Step::byte_array()]);
    }

    #[test]
    fn test_empty_columns() {
        let config = CodecConfig::default();
        let pipeline = plan_column(&TypedArray::Float32(vec![]), &config).unwrap();
        assert_eq!(pipeline.steps(), &[Step::byte_array()]);

        let pipeline = plan_column(&TypedArray::Utf8(vec![]), &config).unwrap();
        assert_eq!(pipeline.steps(), &[Step::string_array()]);
    }

    #[test]
    fn test_string_index_pipeline_override() {
        let array = TypedArray::from(vec!["a", "b", "a"]);
        let config = CodecConfig {
            string_index_pipeline: Some(vec![Step::delta(), Step::byte_array()]),
            ..CodecConfig::default()
        };
        let pipeline = plan_column(&array, &config).unwrap();
        assert_eq!(
            pipeline.steps(),
            &[Step::StringArray {
                index_pipeline: Some(vec![Step::delta(), Step::byte_array()])
            }]
        );
        assert_eq!(decode(&encode_auto(&array, &config).unwrap()).unwrap(), array);
    }
}
