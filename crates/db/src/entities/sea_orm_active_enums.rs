//! `SeaORM` active enums stored as short strings.
//!
//! Each enum mirrors a `mizan-core` enum and converts both ways, so repositories speak
//! core types and entities speak column values.

use mizan_core::{ledger, payroll, project, treasury};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

macro_rules! mirror_enum {
    ($(#[$meta:meta])* $name:ident => $core:path { $($variant:ident = $value:tt),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            EnumIter,
            DeriveActiveEnum,
            Serialize,
            Deserialize,
        )]
        #[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
        pub enum $name {
            $(
                #[doc = $value]
                #[sea_orm(string_value = $value)]
                $variant,
            )+
        }

        impl From<$name> for $core {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$core> for $name {
            fn from(value: $core) -> Self {
                type Source = $core;
                match value {
                    $(Source::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum! {
    /// DEBIT or CREDIT.
    EntryType => ledger::EntryType { Debit = "DEBIT", Credit = "CREDIT" }
}

mirror_enum! {
    /// Which table a ledger row's `party_id` points into.
    PartyType => ledger::PartyType {
        Customer = "customer",
        Supplier = "supplier",
        Contact = "contact",
        Employee = "employee",
    }
}

mirror_enum! {
    /// Originating business event of a ledger row or treasury movement.
    ReferenceType => ledger::ReferenceType {
        Project = "PROJECT",
        Sale = "SALE",
        Return = "RETURN",
        Purchase = "PURCHASE",
        Salary = "SALARY",
        Bonus = "BONUS",
        Receipt = "RECEIPT",
        Payment = "PAYMENT",
        Adjustment = "ADJUSTMENT",
        OpeningBalance = "OPENING_BALANCE",
    }
}

mirror_enum! {
    /// Treasury movement direction.
    MovementDirection => treasury::MovementDirection { In = "IN", Out = "OUT" }
}

mirror_enum! {
    /// PARTIAL or FINAL salary payment.
    SalaryPaymentType => payroll::SalaryPaymentType { Partial = "PARTIAL", Final = "FINAL" }
}

mirror_enum! {
    /// Bonus kind.
    BonusType => payroll::BonusType {
        Bonus = "BONUS",
        Raise = "RAISE",
        Incentive = "INCENTIVE",
        Overtime = "OVERTIME",
    }
}

mirror_enum! {
    /// Project lifecycle state.
    ProjectStatus => project::ProjectStatus {
        Planned = "PLANNED",
        InProgress = "IN_PROGRESS",
        Completed = "COMPLETED",
        Cancelled = "CANCELLED",
    }
}

mirror_enum! {
    /// MATERIAL or SERVICE expense line.
    ItemType => project::ItemType { Material = "MATERIAL", Service = "SERVICE" }
}

mirror_enum! {
    /// ESTIMATED or ACTUAL expense line.
    ExpenseType => project::ExpenseType { Estimated = "ESTIMATED", Actual = "ACTUAL" }
}
