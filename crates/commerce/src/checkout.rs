//! The checkout sequencer.
//!
//! A forward-biased, backward-navigable four-step wizard over a single
//! form record: contact info, delivery address, delivery slot,
//! confirmation. Step transitions validate and *stage* effects; nothing
//! touches the stores until [`Checkout::confirm`], which applies every
//! staged effect and the order commit as one sequence. Abandoning the
//! wizard at any step therefore discards only the form.
//!
//! Commit ordering is deliberate: the order is recorded before the cart
//! is cleared, so an interrupted commit can lose the clear but never a
//! recorded order.

use chrono::{Days, Local, NaiveDate};
use thiserror::Error;
use tracing::info;

use shophub_core::{DeliverySlot, OrderId, OrderStatus};

use crate::account::{AccountError, AccountStore, NewAddress, NewOrder, OrderItem};
use crate::cart::{CartItem, CartStore};
use crate::storage::StorageError;

/// The four wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckoutStep {
    /// Name, email and phone.
    Contact,
    /// Street, city and postal code.
    Address,
    /// Delivery date and time window.
    Delivery,
    /// Review and place the order.
    Confirm,
}

impl CheckoutStep {
    /// 1-based position for the step indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Contact => 1,
            Self::Address => 2,
            Self::Delivery => 3,
            Self::Confirm => 4,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Contact | Self::Address => Self::Contact,
            Self::Delivery => Self::Address,
            Self::Confirm => Self::Delivery,
        }
    }
}

/// Everything entered across the wizard.
///
/// The record survives backward navigation unchanged; it is discarded
/// with the sequencer when the wizard is closed without confirming.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: DeliverySlot,
}

/// A mutation staged by a step transition and applied at
/// [`Checkout::confirm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Provision a profile from the contact fields (lazy account
    /// creation).
    ProvisionAccount,
    /// Save the entered address as the new default.
    SaveDefaultAddress,
}

/// Errors from checkout transitions and the commit.
///
/// Validation variants carry the user-facing message via `Display` and
/// leave the wizard state unchanged.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("please fill in your name, email and phone")]
    MissingContactFields,

    #[error("please fill in the delivery address")]
    MissingAddressFields,

    #[error("please choose a delivery date")]
    MissingDeliveryDate,

    /// Delivery is offered from the next calendar day onwards.
    #[error("delivery is available from {min} onwards")]
    DeliveryDateTooSoon { min: NaiveDate },

    /// The transition does not apply to the wizard's current step.
    #[error("checkout is at step {found}, cannot perform this transition")]
    WrongStep { found: u8 },

    /// This sequencer already committed an order.
    #[error("this checkout already placed order {0}")]
    AlreadyPlaced(OrderId),

    /// A staged effect failed while committing.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// The order is recorded but the cart record could not be cleared.
    /// Retry the clear alone; do not resubmit the order.
    #[error("order {order_id} was recorded but the cart could not be cleared")]
    CartClearFailed {
        order_id: OrderId,
        #[source]
        source: StorageError,
    },
}

/// The four-step checkout wizard.
#[derive(Debug)]
pub struct Checkout {
    step: CheckoutStep,
    form: CheckoutForm,
    staged: Vec<Effect>,
    needs_account: bool,
    placed: Option<OrderId>,
}

impl Checkout {
    /// Start a checkout, pre-filling the contact fields from the
    /// current profile when one exists.
    #[must_use]
    pub fn begin(account: &AccountStore) -> Self {
        let mut form = CheckoutForm::default();
        if let Some(user) = account.user() {
            form.name = user.name.clone();
            form.email = user.email.clone();
            form.phone = user.phone.clone();
        }
        Self {
            step: CheckoutStep::Contact,
            form,
            staged: Vec::new(),
            needs_account: !account.is_authenticated(),
            placed: None,
        }
    }

    /// The wizard's current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The form record.
    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Mutable access to the form record for field entry.
    pub fn form_mut(&mut self) -> &mut CheckoutForm {
        &mut self.form
    }

    /// Effects staged so far, in the order they will be applied.
    #[must_use]
    pub fn staged_effects(&self) -> &[Effect] {
        &self.staged
    }

    /// Earliest selectable delivery date: tomorrow on the local
    /// calendar.
    #[must_use]
    pub fn min_delivery_date() -> NaiveDate {
        Local::now().date_naive() + Days::new(1)
    }

    /// Advance from contact entry once name, email and phone are all
    /// present (presence checks only, no format validation). Stages
    /// account provisioning when no profile existed at begin time.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::MissingContactFields`] leaves the step
    /// unchanged; [`CheckoutError::WrongStep`] if the wizard is not at
    /// the contact step.
    pub fn proceed_from_contact(&mut self) -> Result<&[Effect], CheckoutError> {
        self.expect_step(CheckoutStep::Contact)?;
        self.validate_contact()?;
        if self.needs_account {
            self.stage(Effect::ProvisionAccount);
        }
        self.step = CheckoutStep::Address;
        Ok(&self.staged)
    }

    /// Advance from address entry once street, city and postal code
    /// are all present. Stages saving the address as the new default;
    /// no deduplication against existing addresses is attempted.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::MissingAddressFields`] leaves the step
    /// unchanged; [`CheckoutError::WrongStep`] if the wizard is not at
    /// the address step.
    pub fn proceed_from_address(&mut self) -> Result<&[Effect], CheckoutError> {
        self.expect_step(CheckoutStep::Address)?;
        self.validate_address()?;
        self.stage(Effect::SaveDefaultAddress);
        self.step = CheckoutStep::Delivery;
        Ok(&self.staged)
    }

    /// Advance from delivery selection. The chosen date is validated
    /// here as well, not trusted to the date widget: it must be no
    /// earlier than tomorrow.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::MissingDeliveryDate`] or
    /// [`CheckoutError::DeliveryDateTooSoon`] leave the step unchanged;
    /// [`CheckoutError::WrongStep`] if the wizard is not at the
    /// delivery step.
    pub fn proceed_from_delivery(&mut self) -> Result<&[Effect], CheckoutError> {
        self.expect_step(CheckoutStep::Delivery)?;
        self.validate_delivery()?;
        self.step = CheckoutStep::Confirm;
        Ok(&self.staged)
    }

    /// Go back one step. Always permitted, never validated, and the
    /// entered data is preserved. A no-op at the contact step.
    pub fn back(&mut self) {
        self.step = self.step.previous();
    }

    /// Commit the checkout from the confirmation step.
    ///
    /// Re-validates every step, then applies the staged effects and the
    /// commit in order: provision the profile (when none exists), save
    /// the default address, record the order snapshot, clear the cart.
    /// The snapshot captures the cart's current total and a copy of
    /// each line's id, name, price, quantity and image.
    ///
    /// # Errors
    ///
    /// Validation errors and [`CheckoutError::Account`] failures leave
    /// the cart untouched. [`CheckoutError::CartClearFailed`] means the
    /// order is recorded and only the clear needs retrying. A second
    /// commit on the same sequencer returns
    /// [`CheckoutError::AlreadyPlaced`].
    pub fn confirm(
        &mut self,
        account: &mut AccountStore,
        cart: &mut CartStore,
    ) -> Result<OrderId, CheckoutError> {
        self.expect_step(CheckoutStep::Confirm)?;
        if let Some(order_id) = &self.placed {
            return Err(CheckoutError::AlreadyPlaced(order_id.clone()));
        }
        self.validate_contact()?;
        self.validate_address()?;
        let delivery_date = self.validate_delivery()?;

        if !account.is_authenticated() {
            account.create_user(&self.form.name, &self.form.email, &self.form.phone)?;
        }
        account.add_address(NewAddress {
            street: self.form.street.clone(),
            city: self.form.city.clone(),
            zip_code: self.form.zip_code.clone(),
            is_default: true,
        })?;

        let order_id = account.add_order(NewOrder {
            status: OrderStatus::Processing,
            total: cart.total_price(),
            items: cart.items().iter().map(OrderItem::from).collect(),
            delivery_address: format!("{}, {}", self.form.city, self.form.street),
            delivery_date,
            delivery_time: self.form.delivery_time,
        })?;
        self.placed = Some(order_id.clone());

        // Order first, then cart: a failed clear must never cost the
        // recorded order.
        if let Err(source) = cart.clear() {
            return Err(CheckoutError::CartClearFailed { order_id, source });
        }
        info!(order_id = %order_id, "checkout committed");
        Ok(order_id)
    }

    fn stage(&mut self, effect: Effect) {
        if !self.staged.contains(&effect) {
            self.staged.push(effect);
        }
    }

    fn expect_step(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::WrongStep {
                found: self.step.number(),
            })
        }
    }

    fn validate_contact(&self) -> Result<(), CheckoutError> {
        if self.form.name.is_empty() || self.form.email.is_empty() || self.form.phone.is_empty() {
            return Err(CheckoutError::MissingContactFields);
        }
        Ok(())
    }

    fn validate_address(&self) -> Result<(), CheckoutError> {
        if self.form.street.is_empty() || self.form.city.is_empty() || self.form.zip_code.is_empty()
        {
            return Err(CheckoutError::MissingAddressFields);
        }
        Ok(())
    }

    fn validate_delivery(&self) -> Result<NaiveDate, CheckoutError> {
        let date = self
            .form
            .delivery_date
            .ok_or(CheckoutError::MissingDeliveryDate)?;
        let min = Self::min_delivery_date();
        if date < min {
            return Err(CheckoutError::DeliveryDateTooSoon { min });
        }
        Ok(date)
    }
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id,
            name: item.product.name.clone(),
            price: item.product.price,
            quantity: item.quantity,
            image: item.product.image.clone(),
        }
    }
}
