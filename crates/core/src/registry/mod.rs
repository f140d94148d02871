//! Registry records outside the beneficiary aggregate: generic extra
//! expenditures and donors.

pub mod donor;
pub mod expenditure;

pub use donor::{DonationKind, Donor, DonorContribution, NewContribution, NewDonor};
pub use expenditure::{ExtraExpenditure, NewExtraExpenditure};
