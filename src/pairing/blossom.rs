//! Maximum-weight matching on general graphs.
//!
//! Edmonds' blossom algorithm with primal-dual updates, O(n^3). Vertices are
//! `0..n`, edges are `(u, v, weight)` with integer weights. With
//! `max_cardinality` set, only maximum-cardinality matchings are considered
//! and the heaviest of those is returned.
//!
//! Edge `k` has two endpoints, `2k` (its `u`) and `2k + 1` (its `v`); an
//! endpoint `p` is reached from the opposite endpoint `p ^ 1`. Blossom ids are
//! `n..2n`. Labels: 0 free, 1 S (outer), 2 T (inner), 5 marked during a scan.
//!
//! All integer edge weights must be even so that the S-S slack halving in the
//! dual update stays exact; `min_weight_matching` takes care of that.

use log::trace;

const NONE: usize = usize::MAX;

pub type WeightedEdge = (usize, usize, i64);

/// Heaviest matching; `mate[v]` is the vertex matched to `v`.
pub fn max_weight_matching(
    n_vertices: usize,
    edges: &[WeightedEdge],
    max_cardinality: bool,
) -> Vec<Option<usize>> {
    if edges.is_empty() {
        return vec![None; n_vertices];
    }

    let mut matcher = Matcher::new(n_vertices, edges);
    matcher.solve(max_cardinality);
    matcher.mates()
}

/// Cheapest matching among those of maximum cardinality.
///
/// Costs are flipped into positive, even weights `2 * (max + 1 - cost)`, so
/// every maximum matching has the same constant part and the heaviest one is
/// the cheapest.
pub fn min_weight_matching(n_vertices: usize, edges: &[WeightedEdge]) -> Vec<Option<usize>> {
    let max_cost = edges.iter().map(|&(_, _, w)| w).max().unwrap_or(0);
    let flipped: Vec<WeightedEdge> = edges
        .iter()
        .map(|&(u, v, w)| (u, v, 2 * (max_cost + 1 - w)))
        .collect();

    max_weight_matching(n_vertices, &flipped, true)
}

struct Matcher<'a> {
    n: usize,
    edges: &'a [WeightedEdge],
    endpoint: Vec<usize>,
    neighbend: Vec<Vec<usize>>,
    /// Remote endpoint of the matched edge, per vertex.
    mate: Vec<usize>,
    label: Vec<i8>,
    /// Endpoint through which a vertex/blossom got its label.
    labelend: Vec<usize>,
    /// Top-level blossom containing each vertex.
    inblossom: Vec<usize>,
    blossomparent: Vec<usize>,
    blossomchilds: Vec<Vec<usize>>,
    blossombase: Vec<usize>,
    /// `blossomendps[b][i]` connects `blossomchilds[b][i]` to child `i + 1`.
    blossomendps: Vec<Vec<usize>>,
    /// Least-slack edge to a different S-blossom, or NONE.
    bestedge: Vec<usize>,
    blossombestedges: Vec<Option<Vec<usize>>>,
    unusedblossoms: Vec<usize>,
    dualvar: Vec<i64>,
    allowedge: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a> Matcher<'a> {
    fn new(n: usize, edges: &'a [WeightedEdge]) -> Self {
        let max_weight = edges.iter().map(|&(_, _, w)| w).max().unwrap_or(0).max(0);

        let endpoint: Vec<usize> = (0..2 * edges.len())
            .map(|p| {
                let (u, v, _) = edges[p / 2];
                if p % 2 == 0 { u } else { v }
            })
            .collect();

        let mut neighbend = vec![Vec::new(); n];
        for (k, &(u, v, _)) in edges.iter().enumerate() {
            neighbend[u].push(2 * k + 1);
            neighbend[v].push(2 * k);
        }

        let mut blossombase: Vec<usize> = (0..n).collect();
        blossombase.extend(std::iter::repeat_n(NONE, n));

        let mut dualvar = vec![max_weight; n];
        dualvar.extend(std::iter::repeat_n(0, n));

        Self {
            n,
            edges,
            endpoint,
            neighbend,
            mate: vec![NONE; n],
            label: vec![0; 2 * n],
            labelend: vec![NONE; 2 * n],
            inblossom: (0..n).collect(),
            blossomparent: vec![NONE; 2 * n],
            blossomchilds: vec![Vec::new(); 2 * n],
            blossombase,
            blossomendps: vec![Vec::new(); 2 * n],
            bestedge: vec![NONE; 2 * n],
            blossombestedges: vec![None; 2 * n],
            unusedblossoms: (n..2 * n).collect(),
            dualvar,
            allowedge: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    fn slack(&self, k: usize) -> i64 {
        let (u, v, w) = self.edges[k];
        self.dualvar[u] + self.dualvar[v] - 2 * w
    }

    fn blossom_leaves(&self, b: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                leaves.push(t);
            } else {
                stack.extend(self.blossomchilds[t].iter().rev());
            }
        }
        leaves
    }

    /// Label the top-level blossom of `w` with `t` via endpoint `p`. A T label
    /// immediately propagates an S label to the mate of the blossom's base.
    fn assign_label(&mut self, mut w: usize, mut t: i8, mut p: usize) {
        loop {
            let b = self.inblossom[w];
            self.label[w] = t;
            self.label[b] = t;
            self.labelend[w] = p;
            self.labelend[b] = p;
            self.bestedge[w] = NONE;
            self.bestedge[b] = NONE;

            if t == 1 {
                let leaves = self.blossom_leaves(b);
                self.queue.extend(leaves);
                return;
            }

            let base_mate = self.mate[self.blossombase[b]];
            w = self.endpoint[base_mate];
            t = 1;
            p = base_mate ^ 1;
        }
    }

    /// Trace back from `v` and `w` towards the roots. Returns the base of a
    /// new blossom, or NONE when the two paths reach distinct roots
    /// (an augmenting path).
    fn scan_blossom(&mut self, mut v: usize, mut w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NONE;

        while v != NONE {
            let mut b = self.inblossom[v];
            if self.label[b] & 4 != 0 {
                base = self.blossombase[b];
                break;
            }
            path.push(b);
            self.label[b] = 5;

            if self.labelend[b] == NONE {
                v = NONE;
            } else {
                v = self.endpoint[self.labelend[b]];
                b = self.inblossom[v];
                v = self.endpoint[self.labelend[b]];
            }

            if w != NONE {
                std::mem::swap(&mut v, &mut w);
            }
        }

        for b in path {
            self.label[b] = 1;
        }
        base
    }

    fn add_blossom(&mut self, base: usize, k: usize) {
        let (mut v, mut w, _) = self.edges[k];
        let bb = self.inblossom[base];
        let mut bv = self.inblossom[v];
        let mut bw = self.inblossom[w];

        let b = self
            .unusedblossoms
            .pop()
            .expect("at most n/2 blossoms exist at once");
        self.blossombase[b] = base;
        self.blossomparent[b] = NONE;
        self.blossomparent[bb] = b;

        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossomparent[bv] = b;
            path.push(bv);
            endps.push(self.labelend[bv]);
            v = self.endpoint[self.labelend[bv]];
            bv = self.inblossom[v];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossomparent[bw] = b;
            path.push(bw);
            endps.push(self.labelend[bw] ^ 1);
            w = self.endpoint[self.labelend[bw]];
            bw = self.inblossom[w];
        }

        self.label[b] = 1;
        self.labelend[b] = self.labelend[bb];
        self.dualvar[b] = 0;
        self.blossomchilds[b] = path.clone();
        self.blossomendps[b] = endps;

        for leaf in self.blossom_leaves(b) {
            if self.label[self.inblossom[leaf]] == 2 {
                // Former T vertices become S and must be scanned.
                self.queue.push(leaf);
            }
            self.inblossom[leaf] = b;
        }

        // Least-slack edges from the new blossom to every neighbouring S-blossom.
        let mut bestedgeto = vec![NONE; 2 * self.n];
        for &sub in &path {
            let nblists: Vec<Vec<usize>> = match self.blossombestedges[sub].take() {
                Some(list) => vec![list],
                None => self
                    .blossom_leaves(sub)
                    .into_iter()
                    .map(|leaf| self.neighbend[leaf].iter().map(|p| p / 2).collect())
                    .collect(),
            };

            for nblist in nblists {
                for k in nblist {
                    let (i, j, _) = self.edges[k];
                    let j = if self.inblossom[j] == b { i } else { j };
                    let bj = self.inblossom[j];
                    if bj != b
                        && self.label[bj] == 1
                        && (bestedgeto[bj] == NONE || self.slack(k) < self.slack(bestedgeto[bj]))
                    {
                        bestedgeto[bj] = k;
                    }
                }
            }
            self.bestedge[sub] = NONE;
        }

        let best: Vec<usize> = bestedgeto.into_iter().filter(|&k| k != NONE).collect();
        self.bestedge[b] = NONE;
        for &k in &best {
            if self.bestedge[b] == NONE || self.slack(k) < self.slack(self.bestedge[b]) {
                self.bestedge[b] = k;
            }
        }
        self.blossombestedges[b] = Some(best);
    }

    fn expand_blossom(&mut self, b: usize, endstage: bool) {
        let children = self.blossomchilds[b].clone();
        for &s in &children {
            self.blossomparent[s] = NONE;
            if s < self.n {
                self.inblossom[s] = s;
            } else if endstage && self.dualvar[s] == 0 {
                self.expand_blossom(s, endstage);
            } else {
                for leaf in self.blossom_leaves(s) {
                    self.inblossom[leaf] = s;
                }
            }
        }

        if !endstage && self.label[b] == 2 {
            // Relabel the sub-blossoms on the even-length path from the entry
            // child to the base; the rest become free or stay reachable.
            let endps = self.blossomendps[b].clone();
            let len = children.len() as isize;
            let at = |list: &[usize], j: isize| list[j.rem_euclid(len) as usize];

            let entrychild = self.inblossom[self.endpoint[self.labelend[b] ^ 1]];
            let mut j = position(&children, entrychild) as isize;
            let (jstep, endptrick): (isize, usize) = if j & 1 == 1 {
                j -= len;
                (1, 0)
            } else {
                (-1, 1)
            };
            let trick = endptrick as isize;

            let mut p = self.labelend[b];
            while j != 0 {
                self.label[self.endpoint[p ^ 1]] = 0;
                let q = at(&endps, j - trick) ^ endptrick ^ 1;
                self.label[self.endpoint[q]] = 0;
                self.assign_label(self.endpoint[p ^ 1], 2, p);
                self.allowedge[at(&endps, j - trick) / 2] = true;
                j += jstep;
                p = at(&endps, j - trick) ^ endptrick;
                self.allowedge[p / 2] = true;
                j += jstep;
            }

            let bv = at(&children, j);
            let entry = self.endpoint[p ^ 1];
            self.label[entry] = 2;
            self.label[bv] = 2;
            self.labelend[entry] = p;
            self.labelend[bv] = p;
            self.bestedge[bv] = NONE;

            j += jstep;
            while at(&children, j) != entrychild {
                let bv = at(&children, j);
                if self.label[bv] == 1 {
                    j += jstep;
                    continue;
                }
                let reached = self
                    .blossom_leaves(bv)
                    .into_iter()
                    .find(|&leaf| self.label[leaf] != 0);
                if let Some(v) = reached {
                    self.label[v] = 0;
                    let base_mate = self.mate[self.blossombase[bv]];
                    self.label[self.endpoint[base_mate]] = 0;
                    self.assign_label(v, 2, self.labelend[v]);
                }
                j += jstep;
            }
        }

        self.label[b] = -1;
        self.labelend[b] = NONE;
        self.blossomchilds[b].clear();
        self.blossomendps[b].clear();
        self.blossombase[b] = NONE;
        self.blossombestedges[b] = None;
        self.bestedge[b] = NONE;
        self.unusedblossoms.push(b);
    }

    /// Swap matched and unmatched edges along the path from `v` to the base
    /// of blossom `b`, then rotate the blossom so that `v` is its new base.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.blossomparent[t] != b {
            t = self.blossomparent[t];
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }

        let children = self.blossomchilds[b].clone();
        let endps = self.blossomendps[b].clone();
        let len = children.len() as isize;
        let at = |list: &[usize], j: isize| list[j.rem_euclid(len) as usize];

        let i = position(&children, t);
        let mut j = i as isize;
        let (jstep, endptrick): (isize, usize) = if i & 1 == 1 {
            j -= len;
            (1, 0)
        } else {
            (-1, 1)
        };
        let trick = endptrick as isize;

        while j != 0 {
            j += jstep;
            let t = at(&children, j);
            let p = at(&endps, j - trick) ^ endptrick;
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p]);
            }
            j += jstep;
            let t = at(&children, j);
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p ^ 1]);
            }
            self.mate[self.endpoint[p]] = p ^ 1;
            self.mate[self.endpoint[p ^ 1]] = p;
        }

        self.blossomchilds[b].rotate_left(i);
        self.blossomendps[b].rotate_left(i);
        self.blossombase[b] = self.blossombase[self.blossomchilds[b][0]];
    }

    /// Flip the augmenting path through edge `k` between two S vertices.
    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (mut s, mut p) in [(v, 2 * k + 1), (w, 2 * k)] {
            loop {
                let bs = self.inblossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;

                if self.labelend[bs] == NONE {
                    // Reached a single vertex root.
                    break;
                }

                let t = self.endpoint[self.labelend[bs]];
                let bt = self.inblossom[t];
                s = self.endpoint[self.labelend[bt]];
                let j = self.endpoint[self.labelend[bt] ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.labelend[bt];
                p = self.labelend[bt] ^ 1;
            }
        }
    }

    /// Scan S vertices from the queue. Returns true once the matching grew.
    fn scan_queue(&mut self) -> bool {
        while let Some(v) = self.queue.pop() {
            for idx in 0..self.neighbend[v].len() {
                let p = self.neighbend[v][idx];
                let k = p / 2;
                let w = self.endpoint[p];
                if self.inblossom[v] == self.inblossom[w] {
                    continue;
                }

                let mut kslack = 0;
                if !self.allowedge[k] {
                    kslack = self.slack(k);
                    if kslack <= 0 {
                        self.allowedge[k] = true;
                    }
                }

                if self.allowedge[k] {
                    if self.label[self.inblossom[w]] == 0 {
                        self.assign_label(w, 2, p ^ 1);
                    } else if self.label[self.inblossom[w]] == 1 {
                        let base = self.scan_blossom(v, w);
                        if base != NONE {
                            self.add_blossom(base, k);
                        } else {
                            self.augment_matching(k);
                            return true;
                        }
                    } else if self.label[w] == 0 {
                        // w is inside a T-blossom but not yet reached from outside.
                        self.label[w] = 2;
                        self.labelend[w] = p ^ 1;
                    }
                } else if self.label[self.inblossom[w]] == 1 {
                    let b = self.inblossom[v];
                    if self.bestedge[b] == NONE || kslack < self.slack(self.bestedge[b]) {
                        self.bestedge[b] = k;
                    }
                } else if self.label[w] == 0
                    && (self.bestedge[w] == NONE || kslack < self.slack(self.bestedge[w]))
                {
                    self.bestedge[w] = k;
                }
            }
        }
        false
    }

    fn solve(&mut self, max_cardinality: bool) {
        let n = self.n;

        for stage in 0..n {
            self.label.fill(0);
            self.bestedge.fill(NONE);
            for b in n..2 * n {
                self.blossombestedges[b] = None;
            }
            self.allowedge.fill(false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v] == NONE && self.label[self.inblossom[v]] == 0 {
                    self.assign_label(v, 1, NONE);
                }
            }

            let mut augmented = false;
            loop {
                if self.scan_queue() {
                    augmented = true;
                    break;
                }

                let update = self.dual_update(max_cardinality);
                self.apply_delta(update.delta);

                match update.kind {
                    DeltaKind::Optimum => break,
                    DeltaKind::FreeVertex(k) => {
                        self.allowedge[k] = true;
                        let (i, j, _) = self.edges[k];
                        let i = if self.label[self.inblossom[i]] == 0 { j } else { i };
                        self.queue.push(i);
                    }
                    DeltaKind::SBlossoms(k) => {
                        self.allowedge[k] = true;
                        let (i, _, _) = self.edges[k];
                        self.queue.push(i);
                    }
                    DeltaKind::TBlossom(b) => self.expand_blossom(b, false),
                }
            }

            if !augmented {
                trace!("Matching optimal after {} stages", stage);
                break;
            }

            for b in n..2 * n {
                if self.blossomparent[b] == NONE
                    && self.blossombase[b] != NONE
                    && self.label[b] == 1
                    && self.dualvar[b] == 0
                {
                    self.expand_blossom(b, true);
                }
            }
        }
    }

    /// Smallest dual change that keeps the solution dual-feasible, and what
    /// it unlocks.
    fn dual_update(&self, max_cardinality: bool) -> DualUpdate {
        let n = self.n;
        let mut best: Option<DualUpdate> = None;
        let mut consider = |delta: i64, kind: DeltaKind| {
            if best.as_ref().is_none_or(|current| delta < current.delta) {
                best = Some(DualUpdate { delta, kind });
            }
        };

        if !max_cardinality {
            let min_dual = self.dualvar[..n].iter().copied().min().unwrap_or(0);
            consider(min_dual, DeltaKind::Optimum);
        }

        for v in 0..n {
            if self.label[self.inblossom[v]] == 0 && self.bestedge[v] != NONE {
                consider(self.slack(self.bestedge[v]), DeltaKind::FreeVertex(self.bestedge[v]));
            }
        }

        for b in 0..2 * n {
            if self.blossomparent[b] == NONE && self.label[b] == 1 && self.bestedge[b] != NONE {
                consider(self.slack(self.bestedge[b]) / 2, DeltaKind::SBlossoms(self.bestedge[b]));
            }
        }

        for b in n..2 * n {
            if self.blossombase[b] != NONE && self.blossomparent[b] == NONE && self.label[b] == 2 {
                consider(self.dualvar[b], DeltaKind::TBlossom(b));
            }
        }

        best.unwrap_or_else(|| {
            // Nothing left to grow: the maximum-cardinality optimum is reached.
            let min_dual = self.dualvar[..n].iter().copied().min().unwrap_or(0);
            DualUpdate {
                delta: min_dual.max(0),
                kind: DeltaKind::Optimum,
            }
        })
    }

    fn apply_delta(&mut self, delta: i64) {
        let n = self.n;
        for v in 0..n {
            match self.label[self.inblossom[v]] {
                1 => self.dualvar[v] -= delta,
                2 => self.dualvar[v] += delta,
                _ => {}
            }
        }
        for b in n..2 * n {
            if self.blossombase[b] != NONE && self.blossomparent[b] == NONE {
                match self.label[b] {
                    1 => self.dualvar[b] += delta,
                    2 => self.dualvar[b] -= delta,
                    _ => {}
                }
            }
        }
    }

    fn mates(&self) -> Vec<Option<usize>> {
        self.mate
            .iter()
            .map(|&p| if p == NONE { None } else { Some(self.endpoint[p]) })
            .collect()
    }
}

struct DualUpdate {
    delta: i64,
    kind: DeltaKind,
}

enum DeltaKind {
    /// No further augmentation possible.
    Optimum,
    /// Edge between an S vertex and a free vertex became tight.
    FreeVertex(usize),
    /// Edge between two S-blossoms became tight.
    SBlossoms(usize),
    /// T-blossom dual reached zero and must be expanded.
    TBlossom(usize),
}

fn position(list: &[usize], item: usize) -> usize {
    list.iter()
        .position(|&x| x == item)
        .expect("child belongs to its parent blossom")
}
