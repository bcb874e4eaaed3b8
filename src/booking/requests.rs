//! Form DTOs for the booking flow

use serde::Deserialize;

use super::session::TicketCounts;

/// Step-two form. The club-rep page only renders the student field, so
/// the other counts default to zero there.
#[derive(Debug, Deserialize)]
pub struct QuantitiesForm {
    #[serde(default)]
    pub number_of_adult_tickets: i32,
    #[serde(default)]
    pub number_of_child_tickets: i32,
    #[serde(default)]
    pub number_of_student_tickets: i32,
}

impl QuantitiesForm {
    pub fn counts(&self) -> TicketCounts {
        TicketCounts {
            adult: self.number_of_adult_tickets.max(0),
            child: self.number_of_child_tickets.max(0),
            student: self.number_of_student_tickets.max(0),
        }
    }
}

/// Customer payment page. The details are collected and discarded; actual
/// card processing is out of scope, the step only gates the confirm page.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

/// Step-four form: where to send the confirmation
#[derive(Debug, Deserialize)]
pub struct EmailForm {
    pub email_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_form_counts_clamp_to_zero() {
        let form = QuantitiesForm {
            number_of_adult_tickets: -3,
            number_of_child_tickets: 2,
            number_of_student_tickets: 0,
        };
        let counts = form.counts();
        assert_eq!(counts.adult, 0);
        assert_eq!(counts.total(), 2);
    }
}
