//! The user/profile store: identity, address book and order history.
//!
//! At most one profile exists per session scope, persisted under the
//! `profile` storage key. The profile is provisioned lazily (first
//! checkout step) and destroyed irreversibly by logout. This store is
//! the sole place a commerce transaction becomes permanent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use shophub_core::{AddressId, DeliverySlot, OrderId, OrderStatus, Price, ProductId, UserId};

use crate::storage::{JsonStore, StorageError, keys};

/// Errors from profile operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The underlying record could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The operation requires a profile but none exists.
    #[error("no active profile")]
    NotAuthenticated,

    /// The referenced address does not exist on the profile.
    #[error("address not found: {0}")]
    AddressNotFound(AddressId),
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Store-assigned id.
    pub id: AddressId,
    /// Street, house and apartment line.
    pub street: String,
    /// City name.
    pub city: String,
    /// Postal code.
    pub zip_code: String,
    /// Whether this address has pre-fill/display priority. At most one
    /// address per profile carries the flag.
    pub is_default: bool,
}

/// Address fields as entered, before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub is_default: bool,
}

/// One line of an order snapshot.
///
/// Deliberately narrower than a catalog product: only the fields the
/// order history displays are captured at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub image: String,
}

/// A committed order.
///
/// Orders are append-only: total, items and dates are captured when the
/// order is placed and never recomputed from later catalog state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Human-facing order reference.
    pub id: OrderId,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Total captured at commit time.
    pub total: Price,
    /// Snapshot of the cart lines at commit time.
    pub items: Vec<OrderItem>,
    /// Denormalized `"{city}, {street}"` display string.
    pub delivery_address: String,
    /// Chosen delivery day.
    pub delivery_date: NaiveDate,
    /// Chosen delivery window.
    pub delivery_time: DeliverySlot,
}

/// Order fields supplied by the checkout sequencer; the id and the
/// placement timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub status: OrderStatus,
    pub total: Price,
    pub items: Vec<OrderItem>,
    pub delivery_address: String,
    pub delivery_date: NaiveDate,
    pub delivery_time: DeliverySlot,
}

/// The user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Assigned at provisioning.
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Saved addresses; at most one is flagged default.
    pub addresses: Vec<Address>,
    /// Order history, newest first.
    pub orders: Vec<Order>,
}

/// Partial contact-field update, shallow-merged into the profile.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Holds the at-most-one active profile, durable under its own key.
#[derive(Debug)]
pub struct AccountStore {
    user: Option<User>,
    store: JsonStore,
}

impl AccountStore {
    /// Open the store, loading any persisted profile.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if a persisted profile exists but
    /// cannot be read.
    pub fn open(store: JsonStore) -> Result<Self, StorageError> {
        let user = store.load(keys::PROFILE)?;
        Ok(Self { user, store })
    }

    /// The current profile, if one exists.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a profile exists. Absence of a stored profile is the
    /// logged-out state; callers guard profile-dependent operations.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The address flagged for pre-fill priority, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.user.as_ref()?.addresses.iter().find(|a| a.is_default)
    }

    /// Provision a fresh profile with empty addresses and orders.
    ///
    /// Unconditionally replaces any existing profile; callers are
    /// expected to check [`Self::is_authenticated`] first. A replaced
    /// profile is logged since its history is lost.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Storage`] if the profile record cannot
    /// be written.
    pub fn create_user(
        &mut self,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<UserId, AccountError> {
        if let Some(existing) = &self.user {
            warn!(user_id = %existing.id, "replacing existing profile");
        }
        let user = User {
            id: UserId::generate(),
            name: name.to_owned(),
            email: email.to_owned(),
            phone: phone.to_owned(),
            addresses: Vec::new(),
            orders: Vec::new(),
        };
        let id = user.id;
        self.user = Some(user);
        self.persist()?;
        info!(user_id = %id, "profile created");
        Ok(id)
    }

    /// Shallow-merge the provided contact fields into the profile.
    /// A silent no-op when no profile exists.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Storage`] if the profile record cannot
    /// be written.
    pub fn update_user(&mut self, update: UserUpdate) -> Result<(), AccountError> {
        let Some(user) = self.user.as_mut() else {
            return Ok(());
        };
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        self.persist()?;
        Ok(())
    }

    /// Append a new address with a fresh id.
    ///
    /// When the new address is marked default, the flag is cleared on
    /// every other address so at most one default exists.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotAuthenticated`] when no profile
    /// exists and [`AccountError::Storage`] if the record cannot be
    /// written.
    pub fn add_address(&mut self, address: NewAddress) -> Result<AddressId, AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotAuthenticated)?;
        if address.is_default {
            for existing in &mut user.addresses {
                existing.is_default = false;
            }
        }
        let id = AddressId::generate();
        user.addresses.push(Address {
            id,
            street: address.street,
            city: address.city,
            zip_code: address.zip_code,
            is_default: address.is_default,
        });
        self.persist()?;
        Ok(id)
    }

    /// Flag `address_id` as the default and clear the flag everywhere
    /// else.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::AddressNotFound`] for an unknown id
    /// (the list is left unchanged), [`AccountError::NotAuthenticated`]
    /// when no profile exists, and [`AccountError::Storage`] if the
    /// record cannot be written.
    pub fn set_default_address(&mut self, address_id: AddressId) -> Result<(), AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotAuthenticated)?;
        if !user.addresses.iter().any(|a| a.id == address_id) {
            return Err(AccountError::AddressNotFound(address_id));
        }
        for address in &mut user.addresses {
            address.is_default = address.id == address_id;
        }
        self.persist()?;
        Ok(())
    }

    /// Record an order: assign an `ORD-` reference, stamp the current
    /// time and prepend to the history (newest first).
    ///
    /// No validation of the snapshot happens here; the checkout
    /// sequencer is responsible for supplying a correct one.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotAuthenticated`] when no profile
    /// exists and [`AccountError::Storage`] if the record cannot be
    /// written.
    pub fn add_order(&mut self, order: NewOrder) -> Result<OrderId, AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotAuthenticated)?;
        let id = OrderId::generate();
        user.orders.insert(
            0,
            Order {
                id: id.clone(),
                placed_at: Utc::now(),
                status: order.status,
                total: order.total,
                items: order.items,
                delivery_address: order.delivery_address,
                delivery_date: order.delivery_date,
                delivery_time: order.delivery_time,
            },
        );
        self.persist()?;
        info!(order_id = %id, total = %order.total, "order recorded");
        Ok(id)
    }

    /// Discard the entire profile, irreversibly.
    ///
    /// Identity, addresses and order history are removed from durable
    /// storage; there is no sign-back-in, the next profile starts
    /// empty. The cart is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Storage`] if the record cannot be
    /// removed.
    pub fn logout(&mut self) -> Result<(), AccountError> {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "profile discarded");
        }
        self.store.remove(keys::PROFILE)?;
        Ok(())
    }

    fn persist(&self) -> Result<(), StorageError> {
        match &self.user {
            Some(user) => self.store.save(keys::PROFILE, user),
            None => self.store.remove(keys::PROFILE),
        }
    }
}
