//! Label expansion pipeline
//!
//! One piece at a time: split alternatives, parse, sort into score order,
//! propagate keys and pedal, then derive chord type, chord tones and the
//! global-frame spelling for every label. Per-label failures stay on the
//! label; piece-level failures abandon the piece before any tones are built.
//!
//! `expand_corpus` runs independent pieces in parallel with one shared
//! `ToneCache`.

use num_rational::Ratio;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::chord_tones::ToneCache;
use crate::models::chord::{ChordType, ParsedLabel};
use crate::models::context::{Context, Position};
use crate::models::degree::NoteName;
use crate::models::errors::{LabelError, PieceError};
use crate::models::tone_set::{ChordTones, ToneLayout, ToneWarning};
use crate::models::tpc::{roman_numeral_to_tpc_offset, Tpc};
use crate::parse::{parse_label, split_alternatives};
use crate::propagation::propagate;
use crate::transposition::{to_absolute_pitch, to_global_frame, GlobalChord};

/// Share of immediate repetitions above which a piece is suspicious
const REPETITION_THRESHOLD: f64 = 0.1;

/// One raw annotation and where it sits in the score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordLabel {
    pub position: Position,
    pub label: String,
}

impl ChordLabel {
    pub fn new(position: Position, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
        }
    }
}

/// All labels of one piece, in any order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: String,
    pub labels: Vec<ChordLabel>,
}

impl Piece {
    pub fn new(id: impl Into<String>, labels: Vec<ChordLabel>) -> Self {
        Self { id: id.into(), labels }
    }

    /// A piece whose labels are already in score order, one per measure
    pub fn from_texts<S: AsRef<str>>(id: impl Into<String>, labels: &[S]) -> Self {
        let labels = labels
            .iter()
            .enumerate()
            .map(|(i, text)| ChordLabel::new(Position::new(i as u32 + 1, Ratio::from_integer(0)), text.as_ref()))
            .collect();
        Self::new(id, labels)
    }
}

/// Which tonic chord tones are counted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneFrame {
    #[default]
    Local,
    Global,
    /// Relative to C, so tpcs name absolute pitch classes
    Absolute,
    /// Relative to the global tonic, with the piece reported in C
    AllInC,
}

/// Settings for an expansion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandOptions {
    /// Resolve keys and pedal; without it only parsing and chord types are produced
    pub propagate: bool,

    /// Compute chord tones
    pub chord_tones: bool,

    pub tone_layout: ToneLayout,

    pub tone_frame: ToneFrame,

    /// Also spell every chord as a degree of the global key
    pub relative_to_global: bool,

    /// Re-express pedals when the local key changes inside a span
    pub relative_pedal: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            propagate: true,
            chord_tones: true,
            tone_layout: ToneLayout::Separate,
            tone_frame: ToneFrame::Local,
            relative_to_global: false,
            relative_pedal: true,
        }
    }
}

/// Everything derived for one input label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRecord {
    pub position: Position,
    /// The label as given, alternatives included
    pub label: String,
    /// Second reading after `-`, kept verbatim
    pub alt_label: Option<String>,
    pub parsed: Option<ParsedLabel>,
    pub context: Option<Context>,
    pub chord_type: Option<ChordType>,
    pub tones: Option<ChordTones>,
    pub global: Option<GlobalChord>,
    pub error: Option<LabelError>,
    pub warnings: Vec<ToneWarning>,
}

impl LabelRecord {
    fn new(input: &ChordLabel) -> Self {
        let (primary, alternative) = split_alternatives(&input.label);
        let (parsed, error) = match parse_label(primary) {
            Ok(parsed) => (Some(parsed), None),
            Err(e) => {
                log::warn!("{}", e);
                (None, Some(e))
            }
        };
        Self {
            position: input.position,
            label: input.label.clone(),
            alt_label: alternative.map(str::to_string),
            chord_type: parsed
                .as_ref()
                .and_then(|p| p.chord.as_ref())
                .and_then(ChordType::from_chord),
            parsed,
            context: None,
            tones: None,
            global: None,
            error,
            warnings: Vec::new(),
        }
    }
}

/// Expanded labels of one piece, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieceExpansion {
    pub piece: String,
    pub labels: Vec<LabelRecord>,
}

impl PieceExpansion {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Records that carry a per-label error
    pub fn errors(&self) -> impl Iterator<Item = &LabelRecord> {
        self.labels.iter().filter(|r| r.error.is_some())
    }
}

/// Indices of `labels` in score order; ties keep input order
fn score_order(labels: &[ChordLabel]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by_key(|&i| labels[i].position);
    order
}

/// Log immediate repetitions; warn when they are frequent enough to suggest
/// the input is not a list of label changes
fn check_repetitions(piece: &str, labels: &[ChordLabel], order: &[usize]) -> usize {
    let repeated = order
        .windows(2)
        .filter(|pair| labels[pair[0]].label == labels[pair[1]].label)
        .inspect(|pair| {
            log::debug!(
                "{}: '{}' repeated at {:?}",
                piece,
                labels[pair[1]].label,
                labels[pair[1]].position
            )
        })
        .count();
    if !labels.is_empty() && repeated as f64 / labels.len() as f64 > REPETITION_THRESHOLD {
        log::warn!(
            "{}: {} of {} labels repeat the previous one. Labels should only be given where they change",
            piece,
            repeated,
            labels.len()
        );
    }
    repeated
}

/// Offset from the local tonic to the tonic `frame` counts from
fn frame_offset(frame: ToneFrame, context: &Context) -> Tpc {
    let to_global = || roman_numeral_to_tpc_offset(&context.localkey, context.globalkey_is_minor);
    match frame {
        ToneFrame::Local => 0,
        ToneFrame::Global | ToneFrame::AllInC => to_global(),
        ToneFrame::Absolute => to_global() + to_absolute_pitch(&context.globalkey),
    }
}

/// Expand every label of a piece
pub fn expand_piece(piece: &Piece, options: &ExpandOptions, cache: &ToneCache) -> Result<PieceExpansion, PieceError> {
    log::info!("Expanding {} ({} labels)", piece.id, piece.labels.len());

    let mut records: Vec<LabelRecord> = piece.labels.iter().map(LabelRecord::new).collect();
    let order = score_order(&piece.labels);
    check_repetitions(&piece.id, &piece.labels, &order);

    if !options.propagate {
        return Ok(PieceExpansion {
            piece: piece.id.clone(),
            labels: records,
        });
    }

    let in_score_order: Vec<Option<&ParsedLabel>> = order.iter().map(|&i| records[i].parsed.as_ref()).collect();
    let contexts = propagate(&piece.id, &in_score_order, options.relative_pedal)?;

    for (&index, context) in order.iter().zip(contexts) {
        resolve_record(&mut records[index], context, options, cache);
    }

    let failed = records.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        log::warn!("{}: {} of {} labels could not be expanded", piece.id, failed, records.len());
    }

    Ok(PieceExpansion {
        piece: piece.id.clone(),
        labels: records,
    })
}

/// Fill in the context-dependent fields of one record
fn resolve_record(record: &mut LabelRecord, context: Context, options: &ExpandOptions, cache: &ToneCache) {
    record.context = Some(match options.tone_frame {
        ToneFrame::AllInC => Context::new(NoteName::c(context.globalkey_is_minor), context.localkey, context.pedal),
        _ => context,
    });

    let chord = match record.parsed.as_ref().and_then(|p| p.chord.as_ref()) {
        Some(chord) if !chord.is_no_chord() => chord,
        _ => return,
    };

    if options.chord_tones {
        match cache.get_or_compute(chord, context.localkey_is_minor) {
            Ok(Some(result)) => {
                let offset = frame_offset(options.tone_frame, &context);
                record.tones = Some(result.tones.transposed(offset).arrange(options.tone_layout));
                record.warnings = result.warnings.clone();
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("{}: {}", record.label, e);
                record.error = Some(e);
                return;
            }
        }
    }

    if options.relative_to_global {
        match to_global_frame(chord, &context) {
            Ok(global) => record.global = global,
            Err(e) => {
                log::warn!("{}: {}", record.label, e);
                record.error = Some(e);
            }
        }
    }
}

/// Expand independent pieces in parallel, one result per piece in input order
pub fn expand_corpus(
    pieces: &[Piece],
    options: &ExpandOptions,
    cache: &ToneCache,
) -> Vec<Result<PieceExpansion, PieceError>> {
    let results: Vec<Result<PieceExpansion, PieceError>> =
        pieces.par_iter().map(|piece| expand_piece(piece, options, cache)).collect();

    for result in &results {
        if let Err(e) = result {
            log::error!("{}", e);
        }
    }
    log::info!(
        "Expanded {} pieces, {} distinct chords cached",
        pieces.len(),
        cache.len()
    );
    results
}
