use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::item;
use crate::item::model::ItemSnapshot;
use crate::message::model::{LastMessage, Message};
use crate::user;
use crate::user::model::Profile;

/// A persistent two-party conversation, potentially spanning several listed
/// items over time. Participant slots are positionally aligned across the
/// `participant_*` arrays. All `*_for` fields are scoped to a single user and
/// never leak into the other participant's view.
#[derive(Clone, Serialize, Deserialize)]
pub struct Thread {
    id: super::Id,
    participant_ids: [user::Id; 2],
    participant_names: [String; 2],
    participant_avatars: [String; 2],
    discussed_item_ids: Vec<item::Id>,
    last_message: Option<LastMessage>,
    item: Option<ItemSnapshot>,
    seen_by: HashSet<user::Id>,
    unread_items: HashMap<user::Id, HashSet<item::Id>>,
    deleted_for: HashSet<user::Id>,
    deleted_item_conversations: HashMap<user::Id, HashSet<item::Id>>,
    blocked_by: Option<user::Id>,
    created_at: i64,
}

impl Thread {
    pub fn new(one: &Profile, other: &Profile) -> Self {
        let (first, second) = if one.id <= other.id {
            (one, other)
        } else {
            (other, one)
        };

        Self {
            id: super::Id::of(&first.id, &second.id),
            participant_ids: [first.id.clone(), second.id.clone()],
            participant_names: [first.name.clone(), second.name.clone()],
            participant_avatars: [first.avatar_url.clone(), second.avatar_url.clone()],
            discussed_item_ids: Vec::new(),
            last_message: None,
            item: None,
            seen_by: HashSet::new(),
            unread_items: HashMap::new(),
            deleted_for: HashSet::new(),
            deleted_item_conversations: HashMap::new(),
            blocked_by: None,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

impl Thread {
    pub const fn id(&self) -> &super::Id {
        &self.id
    }

    pub const fn participant_ids(&self) -> &[user::Id; 2] {
        &self.participant_ids
    }

    pub fn discussed_item_ids(&self) -> &[item::Id] {
        &self.discussed_item_ids
    }

    pub const fn last_message(&self) -> Option<&LastMessage> {
        self.last_message.as_ref()
    }

    pub const fn item(&self) -> Option<&ItemSnapshot> {
        self.item.as_ref()
    }

    pub const fn blocked_by(&self) -> Option<&user::Id> {
        self.blocked_by.as_ref()
    }

    pub const fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn last_activity_at(&self) -> i64 {
        self.last_message
            .as_ref()
            .map(|m| m.timestamp)
            .unwrap_or(self.created_at)
    }

    pub fn is_participant(&self, user: &user::Id) -> bool {
        self.participant_ids.contains(user)
    }

    pub fn other_participant(&self, user: &user::Id) -> Option<&user::Id> {
        match &self.participant_ids {
            [a, b] if a == user => Some(b),
            [a, b] if b == user => Some(a),
            _ => None,
        }
    }

    pub fn name_of(&self, user: &user::Id) -> Option<&str> {
        self.slot_of(user)
            .map(|slot| self.participant_names[slot].as_str())
    }

    pub fn avatar_of(&self, user: &user::Id) -> Option<&str> {
        self.slot_of(user)
            .map(|slot| self.participant_avatars[slot].as_str())
    }

    pub fn has_seen_latest(&self, user: &user::Id) -> bool {
        self.seen_by.contains(user)
    }

    pub fn unread_items_for(&self, user: &user::Id) -> Vec<item::Id> {
        let mut unread: Vec<item::Id> = self
            .unread_items
            .get(user)
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default();
        unread.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        unread
    }

    pub fn is_deleted_for(&self, user: &user::Id) -> bool {
        self.deleted_for.contains(user)
    }

    pub fn is_item_deleted_for(&self, user: &user::Id, item: &item::Id) -> bool {
        self.deleted_item_conversations
            .get(user)
            .is_some_and(|items| items.contains(item))
    }

    fn slot_of(&self, user: &user::Id) -> Option<usize> {
        self.participant_ids.iter().position(|id| id == user)
    }
}

// mutations, applied only inside a store transaction
impl Thread {
    /// Append-only: an item is never removed from the discussed set.
    pub fn note_discussed_item(&mut self, item: &item::Id) {
        if !self.discussed_item_ids.contains(item) {
            self.discussed_item_ids.push(item.clone());
        }
    }

    /// Thread-side effects of a new message: preview fields, seen set reset
    /// to the sender, live item snapshot, recipient undelete and recipient
    /// unread marking. The recipient's entries are the only state this writes
    /// on behalf of another user.
    pub fn apply_append(&mut self, message: &Message, snapshot: ItemSnapshot, recipient: &user::Id) {
        self.last_message = Some(LastMessage::from(message));
        self.seen_by.clear();
        self.seen_by.insert(message.sender_id().clone());
        self.item = Some(snapshot);
        self.note_discussed_item(message.item_id());

        self.deleted_for.remove(recipient);
        self.unread_items
            .entry(recipient.clone())
            .or_default()
            .insert(message.item_id().clone());
    }

    pub fn mark_seen_by(&mut self, user: &user::Id) {
        self.seen_by.insert(user.clone());
    }

    pub fn mark_item_read(&mut self, user: &user::Id, item: &item::Id) {
        if let Some(unread) = self.unread_items.get_mut(user) {
            unread.remove(item);
        }
    }

    pub fn delete_for(&mut self, user: &user::Id) {
        self.deleted_for.insert(user.clone());
    }

    pub fn delete_item_conversation_for(&mut self, user: &user::Id, item: &item::Id) {
        self.deleted_item_conversations
            .entry(user.clone())
            .or_default()
            .insert(item.clone());
    }

    pub fn block(&mut self, blocker: &user::Id) {
        self.blocked_by = Some(blocker.clone());
    }

    pub fn unblock(&mut self) {
        self.blocked_by = None;
    }
}

/// Per-user projection of a thread for listing and detail views: the other
/// participant's display data, this user's unread and visibility state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThreadDto {
    pub id: super::Id,
    pub recipient_id: user::Id,
    pub recipient_name: String,
    pub recipient_avatar: String,
    pub discussed_item_ids: Vec<item::Id>,
    pub unread_item_ids: Vec<item::Id>,
    pub seen_latest: bool,
    pub last_message: Option<LastMessage>,
    pub item: Option<ItemSnapshot>,
    pub blocked: bool,
    pub created_at: i64,
}
