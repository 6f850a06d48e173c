//! Token-local generators for the single-position clique.
//!
//! Generators here may look at neighbors (previous word, disjunctive
//! windows) but every feature describes the center position.

use crate::data::padded::PaddedSequence;
use crate::data::token::Token;
use crate::engine::config::SlashHyphenTreatment;
use crate::engine::constants::NO_ABBR;
use crate::features::collector::FeatureCollector;
use crate::features::patterns::{is_name_case, is_ordinal, is_title, is_title2, is_url};
use crate::features::FeatureContext;

/// All clique-`C` features except the chunk/head/governor conjunctions
pub fn clique_c(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    identity(ctx, seq, position, out);
    shapes(ctx, seq, position, out);
    ngrams(ctx, seq, position, out);
    lexicons(ctx, seq, position, out);
    detectors(ctx, seq, position, out);
    disjunctions(ctx, seq, position, out);
    markers(ctx, seq, position, out);
    verbs(ctx, seq, position, out);
}

fn identity(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);
    let p = seq.at(position, -1);
    let n = seq.at(position, 1);

    if flags.use_word {
        out.build().append(c.word()).append("-WORD").add();
    }
    if flags.use_prev {
        out.build().append(p.word()).append("-PW").add();
        if flags.use_tags {
            if let Some(tag) = p.tag() {
                out.build().append(tag).append("-PTAG").add();
            }
        }
    }
    if flags.use_next {
        out.build().append(n.word()).append("-NW").add();
        if flags.use_tags {
            if let Some(tag) = n.tag() {
                out.build().append(tag).append("-NTAG").add();
            }
        }
    }
    if flags.use_tags {
        if let Some(tag) = c.tag() {
            out.build().append(tag).append("-TAG").add();
        }
    }
    if flags.use_lemmas {
        if let Some(lemma) = c.lemma() {
            out.build().append(lemma).append("-LEM").add();
        }
    }
    if flags.use_prev_next_lemmas {
        if let Some(lemma) = p.lemma() {
            out.build().append(lemma).append("-PLEM").add();
        }
        if let Some(lemma) = n.lemma() {
            out.build().append(lemma).append("-NLEM").add();
        }
    }
    if flags.use_domain_tag {
        if let Some(domain) = c.domain() {
            out.build().append(domain).append("-DOMAIN").add();
        }
    }
    if flags.use_word_pairs {
        out.build().append(c.word()).dash().append(p.word()).append("-W-PW").add();
        out.build().append(c.word()).dash().append(n.word()).append("-W-NW").add();
    }
}

fn shapes(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);
    let p = seq.at(position, -1);
    let n = seq.at(position, 1);
    let c_shape = match ctx.shape(c) {
        Some(shape) => shape,
        None => return,
    };
    let p_shape = ctx.shape(p);
    let n_shape = ctx.shape(n);

    out.build().append(&c_shape).append("-TYPE").add();

    if flags.use_type_seqs {
        if let Some(ps) = &p_shape {
            out.build().append(ps).append("-PTYPE").add();
        }
        if let Some(ns) = &n_shape {
            out.build().append(ns).append("-NTYPE").add();
        }
        out.build()
            .append(p.word())
            .append("...")
            .append(&c_shape)
            .append("-PW_CTYPE")
            .add();
        out.build()
            .append(&c_shape)
            .append("...")
            .append(n.word())
            .append("-NW_CTYPE")
            .add();
    }
    if flags.use_type_seqs2 {
        if let Some(ps) = &p_shape {
            out.build().append(ps).append("...").append(&c_shape).append("-PCTYPE").add();
        }
        if let Some(ns) = &n_shape {
            out.build().append(&c_shape).append("...").append(ns).append("-CNTYPE").add();
        }
        if let (Some(ps), Some(ns)) = (&p_shape, &n_shape) {
            out.build()
                .append(ps)
                .append("...")
                .append(&c_shape)
                .append("...")
                .append(ns)
                .append("-PCNTYPE")
                .add();
        }
    }
    if flags.use_shape_conjunctions {
        if let Some(tag) = c.tag() {
            out.build().append(tag).dash().append(&c_shape).append("-TAG_SHAPE").add();
        }
        if let Some(class) = ctx.distsim_class(c) {
            out.build().append(&class).dash().append(&c_shape).append("-DISTSIM_SHAPE").add();
        }
        out.build()
            .append_display(c.position().unwrap_or(position))
            .dash()
            .append(&c_shape)
            .append("-POS_SHAPE")
            .add();
    }
}

fn ngrams(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    if !ctx.flags.use_n_grams {
        return;
    }
    let c = seq.at(position, 0);
    let grams = ctx.ngrams(c.word());
    let conjoin = if ctx.flags.conjoin_shape_n_grams {
        ctx.shape(c)
    } else {
        None
    };

    for gram in grams.iter() {
        out.add_str(gram);
        if let Some(shape) = &conjoin {
            out.build().append(gram).dash().append(shape).append("-CNGram-CS").add();
        }
    }
}

fn lexicons(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);

    if flags.use_gazettes {
        if let Some(gazetteer) = &ctx.resources.gazetteer {
            if flags.sloppy_gazette {
                for feature in gazetteer.sloppy_matches(c.word()) {
                    out.add_str(feature);
                }
            }
            if flags.clean_gazette {
                for feature in gazetteer.clean_matches(seq, position) {
                    out.add_str(feature);
                }
            }
        }
    }

    if let Some(class) = ctx.distsim_class(c) {
        out.build().append(&class).append("-DISTSIM").add();
    }
}

fn detectors(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);
    let p = seq.at(position, -1);
    let index = position as isize;

    let titles: [(bool, fn(&str) -> bool); 2] =
        [(flags.use_title, is_title), (flags.use_title2, is_title2)];
    for (enabled, matcher) in titles {
        if !enabled {
            continue;
        }
        if matcher(c.word()) {
            out.add_str("IS_TITLE");
        }
        if seq.in_bounds(index - 1) && matcher(p.word()) && is_name_case(c.word()) {
            out.add_str("P_TITLE-C_NAMECASE");
        }
    }

    if flags.use_ordinal {
        let prev_ordinal = is_ordinal(seq, index - 1);
        if is_ordinal(seq, index) {
            out.add_str("C_ORDINAL");
            if prev_ordinal {
                out.add_str("PC_ORDINAL");
            }
        }
        if prev_ordinal {
            out.add_str("P_ORDINAL");
        }
    }

    if flags.use_is_url && is_url(c.word()) {
        out.add_str("IS_URL");
    }

    if let Some(abbr) = c.abbr() {
        let minimal1 = flags.use_minimal_abbr1 && abbr != NO_ABBR;
        if flags.use_abbr || flags.use_minimal_abbr || minimal1 {
            out.build().append(abbr).append("-ABBR").add();
        }
    }

    if flags.use_radical {
        radicals(ctx, c, out);
    }
}

fn radicals(ctx: &FeatureContext<'_>, c: &Token, out: &mut FeatureCollector<'_>) {
    let map = &ctx.resources.radicals;
    let chars: Vec<char> = c.word().chars().collect();
    match chars.as_slice() {
        [] => return,
        [only] => {
            out.build().append_char(map.get(*only)).append("-SINGLE-CHAR-RADICAL").add();
        }
        [first, .., last] => {
            out.build().append_char(map.get(*first)).append("-START-RADICAL").add();
            out.build().append_char(map.get(*last)).append("-END-RADICAL").add();
        }
    }
    for ch in chars {
        out.build().append_char(map.get(ch)).append("-RADICAL").add();
    }
}

fn disjunctions(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c_shape = ctx.shape(seq.at(position, 0));

    if flags.use_disjunctive {
        for i in 1..=flags.disjunction_width as isize {
            let n = seq.at(position, i);
            let p = seq.at(position, -i);
            out.build().append(n.word()).append("-DISJN").add();
            out.build().append(p.word()).append("-DISJP").add();
            if flags.use_disjunctive_shape_interaction {
                if let Some(cs) = &c_shape {
                    out.build().append(n.word()).dash().append(cs).append("-DISJN-CS").add();
                    out.build().append(p.word()).dash().append(cs).append("-DISJP-CS").add();
                }
            }
        }
    }

    if flags.use_wide_disjunctive {
        for i in 1..=flags.wide_disjunction_width as isize {
            out.build().append(seq.at(position, i).word()).append("-DISJWN").add();
            out.build().append(seq.at(position, -i).word()).append("-DISJWP").add();
        }
    }

    if flags.use_either_side_disjunctive {
        for i in 1..=flags.disjunction_width as isize {
            out.build().append(seq.at(position, i).word()).append("-DISJWE").add();
            out.build().append(seq.at(position, -i).word()).append("-DISJWE").add();
        }
    }

    if flags.use_disj_shape {
        for i in 1..=flags.disjunction_width as isize {
            let n_shape = ctx.shape(seq.at(position, i));
            let p_shape = ctx.shape(seq.at(position, -i));
            if let Some(ns) = &n_shape {
                out.build().append(ns).append("-NDISJSHAPE").add();
            }
            if let Some(ps) = &p_shape {
                out.build().append(ps).append("-PDISJSHAPE").add();
            }
            if let Some(cs) = &c_shape {
                if let Some(ns) = &n_shape {
                    out.build().append(cs).dash().append(ns).append("-CNDISJSHAPE").add();
                }
                if let Some(ps) = &p_shape {
                    out.build().append(cs).dash().append(ps).append("-CPDISJSHAPE").add();
                }
            }
        }
    }
}

fn markers(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    let c = seq.at(position, 0);

    if flags.use_class_feature {
        out.add_str("###");
    }
    if flags.use_first_word {
        out.build().append(seq.get(0).word()).append("-FIRSTWORD").add();
    }
    if flags.use_begin_sent {
        let marker = if position == 0 {
            "BEGIN-SENT"
        } else if position + 1 == seq.len() {
            "END-SENT"
        } else {
            "IN-SENT"
        };
        out.add_str(marker);
        if let Some(shape) = ctx.shape(c) {
            out.build().append(&shape).dash().append(marker).add();
        }
    }
    if flags.use_position {
        out.build()
            .append_display(c.position().unwrap_or(position))
            .append("-POSITION")
            .add();
    }

    if let Some(regex) = ctx.split_word {
        let pieces: Vec<&str> = regex.split(c.word()).filter(|s| !s.is_empty()).collect();
        if pieces.len() >= 2 {
            for piece in pieces {
                out.build().append(piece).append("-SPLITWORD").add();
            }
        }
    }

    slash_hyphen(flags.slash_hyphen_treatment, c.word(), out);

    if let Some(bounds) = flags.binned_lengths.as_deref() {
        if let Some(bin) = length_bin(c.word().chars().count(), bounds) {
            out.add_str(&bin);
        }
    }

    if flags.use_unknown {
        if let Some(unknown) = c.unknown() {
            out.build().append(unknown).append("-UNKNOWN").add();
        }
    }
    if flags.use_topics {
        if let Some(topic) = c.topic() {
            out.build().append(topic).append("-TopicID").add();
        }
    }
    if flags.use_generic_features {
        for (key, value) in c.generic() {
            out.build().append(value).dash().append(key).add();
        }
    }
}

fn slash_hyphen(treatment: SlashHyphenTreatment, word: &str, out: &mut FeatureCollector<'_>) {
    if treatment == SlashHyphenTreatment::None || !word.contains(['-', '/']) {
        return;
    }
    let wfrag = matches!(treatment, SlashHyphenTreatment::Wfrag | SlashHyphenTreatment::Both);
    let ignore = matches!(treatment, SlashHyphenTreatment::Ignore | SlashHyphenTreatment::Both);

    if wfrag {
        for frag in word.split(['-', '/']).filter(|f| !f.is_empty()) {
            out.build().append(frag).append("-WFRAG").add();
        }
    }
    if ignore {
        let joined: String = word.chars().filter(|ch| *ch != '-' && *ch != '/').collect();
        if !joined.is_empty() {
            out.build().append(&joined).append("-WORD_NOSH").add();
        }
    }
}

/// `Len-a-b` bucket for `len` under ascending `bounds`; the first bucket
/// starts at 1 and the last is open-ended
pub fn length_bin(len: usize, bounds: &[usize]) -> Option<String> {
    let last = *bounds.last()?;
    let mut lower = 1;
    for &upper in bounds {
        if len <= upper {
            return Some(format!("Len-{}-{}", lower, upper));
        }
        lower = upper;
    }
    Some(format!("Len-{}-Inf", last))
}

fn verbs(
    ctx: &FeatureContext<'_>,
    seq: &PaddedSequence<'_>,
    position: usize,
    out: &mut FeatureCollector<'_>,
) {
    let flags = ctx.flags;
    if !(flags.use_vb || flags.use_prev_vb || flags.use_next_vb) {
        return;
    }
    let index = position as isize;
    let prev_dist = (1..=index).find(|d| seq.get(index - d).is_verb());
    let next_dist = (1..seq.len() as isize - index).find(|d| seq.get(index + d).is_verb());
    let prev = prev_dist.map(|d| seq.get(index - d));
    let next = next_dist.map(|d| seq.get(index + d));

    if flags.use_vb {
        // nearest verb on either side; the previous one wins a tie
        let nearest = match (prev_dist, next_dist) {
            (Some(pd), Some(nd)) if nd < pd => next,
            (Some(_), _) => prev,
            (None, _) => next,
        };
        if let Some(verb) = nearest {
            out.build().append(verb.word()).append("-VB").add();
        }
    }
    if flags.use_prev_vb {
        if let Some(verb) = prev {
            out.build().append(verb.word()).append("-PVB").add();
        }
    }
    if flags.use_next_vb {
        if let Some(verb) = next {
            out.build().append(verb.word()).append("-NVB").add();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bin() {
        assert_eq!(length_bin(34, &[4, 8]).as_deref(), Some("Len-8-Inf"));
        assert_eq!(length_bin(1, &[4, 8]).as_deref(), Some("Len-1-4"));
        assert_eq!(length_bin(4, &[4, 8]).as_deref(), Some("Len-1-4"));
        assert_eq!(length_bin(5, &[4, 8]).as_deref(), Some("Len-4-8"));
        assert_eq!(length_bin(3, &[3, 5, 10]).as_deref(), Some("Len-1-3"));
        assert_eq!(length_bin(11, &[3, 5, 10]).as_deref(), Some("Len-10-Inf"));
        assert_eq!(length_bin(3, &[]), None);
    }
}
