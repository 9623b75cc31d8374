//! Per-section probabilities and the associative join of adjacent sections.
//!
//! A section's tensor leaves out any reference interval that crosses one of its
//! boundaries: such an interval belongs to more than one section and is evaluated
//! once, as a whole, when the sections around it are joined ([join_sections]) or
//! when a window's ends are fixed up ([correct_ends]).
//!
//! With the boundary fragments detached, the tensor of a section spans from
//! [own_begin] to [own_end].

use winsig_core::models::GenomicInterval;

use crate::dp::eval_tensor;
use crate::errors::ModelError;
use crate::logspace::join_tensors;
use crate::markov_chain::MarkovChain;
use crate::models::{Arena, IntervalRange, ProbabilityTensor, Section, SectionProbs};

/// Where the detached tensor of `section` starts.
pub fn own_begin(section: &Section, arena: &Arena) -> i64 {
    match section.refs.first_intersected {
        true => arena.refs[section.refs.start].end,
        false => section.interval.begin,
    }
}

/// Where the detached tensor of `section` ends.
pub fn own_end(section: &Section, arena: &Arena) -> i64 {
    match section.refs.last_intersected {
        true => arena.refs[section.refs.end - 1].begin,
        false => section.interval.end,
    }
}

fn clip(interval: &GenomicInterval, section: &GenomicInterval) -> (i64, i64) {
    (
        interval.begin.max(section.begin),
        interval.end.min(section.end),
    )
}

///
/// For every reference fragment of the section, whether a query fragment of the same
/// section overlaps it.
///
fn fragment_hits(section: &Section, arena: &Arena) -> Vec<bool> {
    let mut queries = arena.queries[section.queries.start..section.queries.end]
        .iter()
        .map(|query| clip(query, &section.interval))
        .peekable();

    arena.refs[section.refs.start..section.refs.end]
        .iter()
        .map(|reference| {
            let (begin, end) = clip(reference, &section.interval);
            while queries
                .peek()
                .is_some_and(|&(_, query_end)| query_end <= begin)
            {
                queries.next();
            }
            queries
                .peek()
                .is_some_and(|&(query_begin, _)| query_begin < end)
        })
        .collect()
}

///
/// Tensor of the section without the reference fragments crossing its boundaries.
///
/// A section lying entirely inside one reference interval contributes nothing of its
/// own and gets the identity tensor.
///
pub fn eval_section_probs(
    section: &Section,
    arena: &Arena,
    chain: &MarkovChain,
) -> Result<SectionProbs, ModelError> {
    if section.refs.is_spanning() {
        return Ok(SectionProbs::default());
    }

    let own = section.refs.own();
    let except_first_and_last = eval_tensor(
        arena.refs[own]
            .iter()
            .map(|reference| (reference.begin, reference.end)),
        own_begin(section, arena),
        own_end(section, arena),
        chain,
    )?;

    Ok(SectionProbs {
        except_first_and_last,
    })
}

///
/// Fill in the probabilities, overlap count and boundary hit flags of a freshly
/// decomposed section.
///
pub fn prepare_section(
    section: &mut Section,
    arena: &Arena,
    chain: &MarkovChain,
) -> Result<(), ModelError> {
    let hits = fragment_hits(section, arena);

    section.overlap_count = hits.iter().filter(|&&hit| hit).count() as i64;
    section.first_ref_hit = hits.first().copied().unwrap_or(false);
    section.last_ref_hit = hits.last().copied().unwrap_or(false);
    section.probs = eval_section_probs(section, arena, chain)?;

    Ok(())
}

fn join_ranges(a: &IntervalRange, b: &IntervalRange) -> IntervalRange {
    IntervalRange {
        start: a.start,
        end: b.end.max(a.end),
        first_intersected: match a.is_empty() {
            true => b.first_intersected,
            false => a.first_intersected,
        },
        last_intersected: match b.is_empty() {
            true => a.last_intersected,
            false => b.last_intersected,
        },
    }
}

///
/// Join two adjacent sections, `a` directly to the left of `b`.
///
/// A reference interval crossing the shared boundary is evaluated once, whole, between
/// the own content of `a` and the own content of `b`, and counted once.
///
pub fn join_sections(
    a: &Section,
    b: &Section,
    arena: &Arena,
    chain: &MarkovChain,
) -> Result<Section, ModelError> {
    if a.interval.end != b.interval.begin || a.interval.sequence_id != b.interval.sequence_id {
        return Err(ModelError::NonAdjacentSections {
            left: (a.interval.begin, a.interval.end),
            right: (b.interval.begin, b.interval.end),
        });
    }

    let straddle = a.refs.last_intersected && b.refs.first_intersected;
    let a_core = &a.probs.except_first_and_last;
    let b_core = &b.probs.except_first_and_last;

    let except_first_and_last = match (straddle, a.refs.is_spanning(), b.refs.is_spanning()) {
        (false, _, _) => join_tensors(a_core, b_core),
        (true, true, true) => ProbabilityTensor::identity(),
        (true, true, false) => b_core.clone(),
        (true, false, true) => a_core.clone(),
        (true, false, false) => {
            let shared = &arena.refs[b.refs.start];
            let middle = eval_tensor([(shared.begin, shared.end)], shared.begin, shared.end, chain)?;
            join_tensors(&join_tensors(a_core, &middle), b_core)
        }
    };

    let shared_hit_twice = straddle && a.last_ref_hit && b.first_ref_hit;
    let first_ref_hit = if a.refs.is_empty() {
        b.first_ref_hit
    } else if straddle && a.refs.len() == 1 {
        a.first_ref_hit || b.first_ref_hit
    } else {
        a.first_ref_hit
    };
    let last_ref_hit = if b.refs.is_empty() {
        a.last_ref_hit
    } else if straddle && b.refs.len() == 1 {
        a.last_ref_hit || b.last_ref_hit
    } else {
        b.last_ref_hit
    };

    Ok(Section {
        interval: GenomicInterval::new(
            a.interval.sequence_id.as_str(),
            a.interval.begin,
            b.interval.end,
        ),
        refs: join_ranges(&a.refs, &b.refs),
        queries: join_ranges(&a.queries, &b.queries),
        probs: SectionProbs {
            except_first_and_last,
        },
        overlap_count: a.overlap_count + b.overlap_count - i64::from(shared_hit_twice),
        first_ref_hit,
        last_ref_hit,
    })
}

///
/// Re-attach the reference fragments that the window boundaries cut, giving the full
/// tensor of the window the section covers.
///
pub fn correct_ends(
    section: &Section,
    arena: &Arena,
    chain: &MarkovChain,
) -> Result<ProbabilityTensor, ModelError> {
    let (begin, end) = (section.interval.begin, section.interval.end);

    if section.refs.is_spanning() {
        return eval_tensor([(begin, end)], begin, end, chain);
    }

    let mut tensor = section.probs.except_first_and_last.clone();

    if section.refs.first_intersected {
        let fragment_end = arena.refs[section.refs.start].end;
        let head = eval_tensor([(begin, fragment_end)], begin, fragment_end, chain)?;
        tensor = join_tensors(&head, &tensor);
    }
    if section.refs.last_intersected {
        let fragment_begin = arena.refs[section.refs.end - 1].begin;
        let tail = eval_tensor([(fragment_begin, end)], fragment_begin, end, chain)?;
        tensor = join_tensors(&tensor, &tail);
    }

    Ok(tensor)
}
