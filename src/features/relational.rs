//! Sequence-relative generators.
//!
//! Each `clique_*` function only reads the offsets its clique covers.
//! `head_conjunctions` is the exception: it fires under the single
//! position clique and combines the center with its chunk, phrase head
//! and governor annotations.

use crate::data::padded::PaddedSequence;
use crate::engine::constants::BRACKET_PAIRS;
use crate::features::collector::FeatureCollector;
use crate::features::FeatureContext;

/// Chunk, NP-head and governor conjunctions for the center token
pub fn head_conjunctions(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    if !(flags.use_chunks || flags.use_np_head || flags.use_np_governor) {
        return;
    }
    let c = seq.at(position, 0);
    let c_tag = c.tag();
    let c_shape = ctx.shape(c);
    let c_ds = ctx.distsim_class(c);

    if flags.use_chunks {
        if let Some(chunk) = c.chunk() {
            out.build().append(chunk).append("-CHUNK").add();
            if let Some(tag) = c_tag {
                out.build().append(chunk).dash().append(tag).append("-CHUNK_TAG").add();
            }
            if let Some(shape) = &c_shape {
                out.build().append(chunk).dash().append(shape).append("-CHUNK_SHAPE").add();
            }
        }
    }

    let heads = [
        (flags.use_np_head, c.head_word(), "HW"),
        (flags.use_np_governor, c.governor(), "GW"),
    ];
    for (enabled, head, marker) in heads {
        let head = match head {
            Some(head) if enabled => head,
            _ => continue,
        };
        out.build().append(head).dash().append(marker).add();
        if let Some(tag) = c_tag {
            out.build().append(head).dash().append(tag).dash().append(marker).append("-T").add();
        }
        if let Some(class) = &c_ds {
            out.build()
                .append(head)
                .dash()
                .append(class)
                .dash()
                .append(marker)
                .append("-DISTSIM")
                .add();
        }
        if let Some(shape) = &c_shape {
            out.build().append(head).dash().append(shape).dash().append(marker).append("-S").add();
        }
    }
}

/// Previous/center pair features
pub fn clique_cpc(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);
    let p = seq.at(position, -1);
    let c_shape = ctx.shape(c);
    let p_shape = ctx.shape(p);

    if flags.use_sequences && flags.use_prev_sequences {
        out.add_str("PSEQ");
        out.build().append(c.word()).append("-PSEQW").add();
        out.build().append(p.word()).dash().append(c.word()).append("-PSEQW2").add();
        out.build().append(p.word()).append("-PSEQpW").add();

        let p_ds = ctx.distsim_class(p);
        let c_ds = ctx.distsim_class(c);
        if let Some(pd) = &p_ds {
            out.build().append(pd).append("-PSEQpDS").add();
        }
        if let Some(cd) = &c_ds {
            out.build().append(cd).append("-PSEQcDS").add();
        }
        if let (Some(pd), Some(cd)) = (&p_ds, &c_ds) {
            out.build().append(pd).dash().append(cd).append("-PSEQpcDS").add();
        }

        if let Some(ps) = &p_shape {
            out.build().append(ps).append("-PSEQpS").add();
        }
        if let Some(cs) = &c_shape {
            out.build().append(cs).append("-PSEQcS").add();
        }
        if let (Some(ps), Some(cs)) = (&p_shape, &c_shape) {
            out.build().append(ps).dash().append(cs).append("-PSEQpcS").add();
        }
    }

    if flags.use_taggy_sequences {
        if let (Some(pt), Some(ct)) = (p.tag(), c.tag()) {
            out.build().append(pt).dash().append(ct).append("-TS").add();
            if flags.use_taggy_sequences_shape_interaction {
                if let Some(cs) = &c_shape {
                    out.build().append(pt).dash().append(ct).dash().append(cs).append("-TS-CS").add();
                }
            }
        }
    }

    if flags.use_type_seqs {
        if let Some(cs) = &c_shape {
            out.build().append(cs).append("-TYPES").add();
            if flags.use_type_seqs2 {
                if let Some(ps) = &p_shape {
                    out.build().append(ps).dash().append(cs).append("-TYPEP").add();
                }
            }
        }
    }

    if flags.use_boundary_sequences && p.is_boundary() {
        out.add_str("BNDRY-SPAN-PSEQ");
    }

    if flags.use_abbr {
        if let (Some(pa), Some(ca)) = (p.abbr(), c.abbr()) {
            out.build().append(pa).dash().append(ca).append("-PABBRANS").add();
        }
    }

    if flags.use_chunks {
        if let (Some(pk), Some(ck)) = (p.chunk(), c.chunk()) {
            out.build().append(pk).dash().append(ck).append("-PCCHUNK").add();
        }
    }
}

/// Features linking the center with the token `k` positions back,
/// skipping everything between
pub fn clique_skip(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    k: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);
    let pk = seq.at(position, -(k as isize));

    if flags.use_long_sequences && flags.use_sequences {
        out.build().append_char('P').append_display(k).append("SKIP").add();
        out.build()
            .append(pk.word())
            .dash()
            .append(c.word())
            .append("-P")
            .append_display(k)
            .append("SKIPW")
            .add();
    }

    if flags.use_abbr && k == 2 {
        if let (Some(pa), Some(ca)) = (pk.abbr(), c.abbr()) {
            out.build().append(pa).dash().append(ca).append("-P2CABBR").add();
        }
    }
}

/// Features over the contiguous chain of `k` preceding positions plus
/// the center
pub fn clique_chain(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    k: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);
    let p = seq.at(position, -1);
    let p2 = seq.at(position, -2);

    let echoes = flags.use_sequences
        && flags.use_prev_sequences
        && flags.max_left >= k
        && (k < 3 || flags.use_long_sequences);
    if echoes {
        out.build().append(&"P".repeat(k)).append("SEQ").add();
        if k == 2 {
            out.build().append(c.word()).append("-PPSEQW").add();
            let shapes = (ctx.shape(p2), ctx.shape(p), ctx.shape(c));
            if let (Some(s2), Some(s1), Some(s0)) = &shapes {
                out.build()
                    .append(s2)
                    .dash()
                    .append(s1)
                    .dash()
                    .append(s0)
                    .append("-PPSEQS")
                    .add();
            }
        }
    }

    if flags.use_taggy_sequences {
        taggy_chain(ctx, seq, position, k, out);
    }

    if k != 2 {
        return;
    }

    if flags.use_paren_matching {
        let matched = BRACKET_PAIRS
            .iter()
            .any(|(open, close)| c.word() == *close && p2.word() == *open);
        if matched {
            out.add_str("PAREN-MATCH");
            if flags.use_tags {
                if let Some(pt) = p.tag() {
                    out.build().append(pt).append("-PAREN-MATCH").add();
                }
            }
        }
    }

    if flags.use_abbr {
        if let (Some(a2), Some(a1), Some(a0)) = (p2.abbr(), p.abbr(), c.abbr()) {
            out.build()
                .append(a2)
                .dash()
                .append(a1)
                .dash()
                .append(a0)
                .append("-P2PABBRANS")
                .add();
        }
    }

    if flags.use_boundary_sequences && p2.is_boundary() {
        out.add_str("BNDRY-SPAN-PPSEQ");
    }

    if flags.use_type_seqs2 {
        if let (Some(s2), Some(s1), Some(s0)) = (ctx.shape(p2), ctx.shape(p), ctx.shape(c)) {
            out.build()
                .append(&s2)
                .dash()
                .append(&s1)
                .dash()
                .append(&s0)
                .append("-TYPETTS")
                .add();
        }
    }
}

/// Number of preceding tags in a taggy chain for a clique reaching `k`
/// positions back
pub fn taggy_chain_len(k: usize, max_left: usize, dont_extend: bool) -> usize {
    let cap = if dont_extend { 2 } else { k };
    k.min(max_left).min(cap)
}

fn taggy_chain(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    k: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let len = taggy_chain_len(k, flags.max_left, flags.dont_extend_taggy);
    if len < 1 {
        return;
    }

    let tags: Option<Vec<&str>> = (0..=len as isize)
        .rev()
        .map(|back| seq.at(position, -back).tag())
        .collect();
    let tags = match tags {
        Some(tags) => tags,
        None => return,
    };
    let marker = format!("{}S", "T".repeat(len));

    out.build().append(&tags.join("-")).dash().append(&marker).add();
    if flags.use_taggy_sequences_shape_interaction {
        if let Some(cs) = ctx.shape(seq.at(position, 0)) {
            out.build()
                .append(&tags.join("-"))
                .dash()
                .append(&cs)
                .dash()
                .append(&marker)
                .append("-CS")
                .add();
        }
    }
}

/// Center/next pair features
pub fn clique_cnc(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);
    let n = seq.at(position, 1);

    if flags.use_sequences && flags.use_next_sequences {
        out.add_str("NSEQ");
        out.build().append(c.word()).append("-NSEQW").add();
        out.build().append(c.word()).dash().append(n.word()).append("-NSEQW2").add();
        out.build().append(n.word()).append("-NSEQnW").add();
    }

    if flags.use_taggy_sequences {
        if let (Some(ct), Some(nt)) = (c.tag(), n.tag()) {
            out.build().append(ct).dash().append(nt).append("-TSN").add();
        }
    }

    if flags.use_boundary_sequences && n.is_boundary() {
        out.add_str("BNDRY-SPAN-NSEQ");
    }
}

/// Symmetric features over previous, center and next
pub fn clique_cpcnc(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);
    let p = seq.at(position, -1);
    let n = seq.at(position, 1);

    if flags.use_sym_tags {
        if let (Some(pt), Some(ct), Some(nt)) = (p.tag(), c.tag(), n.tag()) {
            out.build()
                .append(pt)
                .dash()
                .append(ct)
                .dash()
                .append(nt)
                .append("-PCNTAGS")
                .add();
            let (a, b) = ordered(pt, nt);
            out.build().append(a).dash().append(b).append("-PNTAGS").add();
        }
        if let (Some(pd), Some(cd), Some(nd)) =
            (ctx.distsim_class(p), ctx.distsim_class(c), ctx.distsim_class(n))
        {
            out.build()
                .append(&pd)
                .dash()
                .append(&cd)
                .dash()
                .append(&nd)
                .append("-PCNDISTSIM")
                .add();
        }
    }

    if flags.use_sym_word_pairs {
        let (a, b) = ordered(p.word(), n.word());
        out.build().append(a).dash().append(b).append("-SWORDS").add();
    }
}

fn ordered<'s>(a: &'s str, b: &'s str) -> (&'s str, &'s str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
