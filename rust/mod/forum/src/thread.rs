//! In-memory view of every reply to one question.
//!
//! Replies are indexed by identity with parent/child links kept as ids.
//! Traversals are iterative and track visited ids, so malformed data
//! (a cycle, a parent on another question) cannot loop forever.

use std::collections::{BTreeMap, HashSet};

use quorum_core::ServiceError;
use quorum_orm::{Db, Model};

use crate::model::Reply;

#[derive(Debug, Clone, Default)]
pub struct ReplyThread {
    replies: BTreeMap<i64, Reply>,
    children: BTreeMap<i64, Vec<i64>>,
    roots: Vec<i64>,
}

impl ReplyThread {
    /// Load all replies to a question with a single query.
    pub fn load(db: &Db, question_id: i64) -> Result<Self, ServiceError> {
        Ok(Self::from_replies(Reply::find_by_question_id(db, question_id)?))
    }

    /// Build the index. Unsaved replies are skipped. A reply whose parent is
    /// not part of the set is treated as a root.
    pub fn from_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        let replies: BTreeMap<i64, Reply> = replies
            .into_iter()
            .filter_map(|r| r.id().map(|id| (id, r)))
            .collect();

        let mut children: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        let mut roots = Vec::new();
        for (&id, reply) in &replies {
            match reply.parent_id {
                Some(parent) if parent != id && replies.contains_key(&parent) => {
                    children.entry(parent).or_default().push(id);
                }
                _ => roots.push(id),
            }
        }

        Self {
            replies,
            children,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Reply> {
        self.replies.get(&id)
    }

    /// Top-level replies, oldest first.
    pub fn roots(&self) -> impl Iterator<Item = &Reply> {
        self.roots.iter().filter_map(|id| self.replies.get(id))
    }

    /// Direct children of `id`, oldest first.
    pub fn children(&self, id: i64) -> impl Iterator<Item = &Reply> {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|c| self.replies.get(c))
    }

    pub fn parent(&self, id: i64) -> Option<&Reply> {
        let parent = self.replies.get(&id)?.parent_id?;
        self.replies.get(&parent)
    }

    /// Parent, grandparent, ... up to the root. Stops if a reply repeats.
    pub fn ancestors(&self, id: i64) -> Vec<&Reply> {
        let mut seen = HashSet::from([id]);
        let mut out = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let Some(parent_id) = parent.id() else { break };
            if !seen.insert(parent_id) {
                break;
            }
            out.push(parent);
            current = parent_id;
        }
        out
    }

    /// Every reply below `id`, depth first, paired with its depth
    /// relative to `id` (children are at depth 1).
    pub fn descendants(&self, id: i64) -> Vec<(usize, &Reply)> {
        let mut seen = HashSet::from([id]);
        let mut out = Vec::new();
        let mut stack: Vec<(usize, i64)> = self.child_ids(id).rev().map(|c| (1, c)).collect();

        while let Some((depth, next)) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            if let Some(reply) = self.replies.get(&next) {
                out.push((depth, reply));
            }
            stack.extend(self.child_ids(next).rev().map(|c| (depth + 1, c)));
        }
        out
    }

    /// The whole thread depth first from each root, roots at depth 0.
    pub fn walk(&self) -> Vec<(usize, &Reply)> {
        let mut out = Vec::with_capacity(self.replies.len());
        for root in self.roots() {
            out.push((0, root));
            if let Some(id) = root.id() {
                out.extend(self.descendants(id));
            }
        }
        out
    }

    fn child_ids(&self, id: i64) -> impl DoubleEndedIterator<Item = i64> + '_ {
        self.children.get(&id).into_iter().flatten().copied()
    }
}
