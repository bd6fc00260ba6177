//! Volumetric and billing weight.
//!
//! Carriers bill the larger of actual weight and volumetric weight, where volumetric
//! weight is the package volume in cm³ divided by the carrier divisor (5000 by default).

use super::CalcError;
use crate::model::{Dimensions, LineItem};

fn check_divisor(divisor: f64) -> Result<(), CalcError> {
    if divisor.is_finite() && divisor > 0.0 {
        Ok(())
    } else {
        Err(CalcError::InvalidDivisor(divisor))
    }
}

/// Volumetric weight in kg of one package.
pub fn volumetric_weight(dimensions: &Dimensions, divisor: f64) -> Result<f64, CalcError> {
    check_divisor(divisor)?;
    let (length, width, height) = dimensions.to_cm();
    Ok(length * width * height / divisor)
}

/// `max(actual, volumetric)`; actual weight applies when there are no dimensions.
pub fn billing_weight(
    actual_kg: f64,
    dimensions: Option<&Dimensions>,
    divisor: f64,
) -> Result<f64, CalcError> {
    check_divisor(divisor)?;
    match dimensions {
        Some(dimensions) => Ok(actual_kg.max(volumetric_weight(dimensions, divisor)?)),
        None => Ok(actual_kg),
    }
}

/// Billing weight of a whole row: per-unit billing weight × quantity.
pub fn line_billing_weight(item: &LineItem, divisor: f64) -> Result<f64, CalcError> {
    let per_unit = billing_weight(item.weight_kg, item.dimensions.as_ref(), divisor)?;
    Ok(per_unit * item.quantity as f64)
}

/// Billing weight of a consignment.
pub fn quote_billing_weight(items: &[LineItem], divisor: f64) -> Result<f64, CalcError> {
    check_divisor(divisor)?;
    items
        .iter()
        .map(|item| line_billing_weight(item, divisor))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineItemId, NewLineItem};

    const DIVISOR: f64 = 5000.0;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn inches_match_their_centimeter_equivalent() {
        for (l, w, h) in [(10.0, 8.0, 4.0), (1.0, 1.0, 1.0), (24.5, 12.25, 3.0)] {
            let inches = volumetric_weight(&Dimensions::inches(l, w, h), DIVISOR).unwrap();
            let cm = volumetric_weight(
                &Dimensions::cm(l * 2.54, w * 2.54, h * 2.54),
                DIVISOR,
            )
            .unwrap();
            assert!(close(inches, cm), "{inches} != {cm}");
        }
    }

    #[test]
    fn volumetric_weight_of_a_box() {
        // 50 × 40 × 30 cm = 60 000 cm³
        let weight = volumetric_weight(&Dimensions::cm(50.0, 40.0, 30.0), DIVISOR).unwrap();
        assert!(close(weight, 12.0));
    }

    #[test]
    fn billing_weight_is_never_below_either_weight() {
        let boxes = [
            Dimensions::cm(50.0, 40.0, 30.0),
            Dimensions::cm(10.0, 10.0, 10.0),
            Dimensions::inches(12.0, 9.0, 2.0),
        ];
        for dims in &boxes {
            for actual in [0.0, 0.2, 1.5, 12.0, 40.0] {
                let billed = billing_weight(actual, Some(dims), DIVISOR).unwrap();
                let volumetric = volumetric_weight(dims, DIVISOR).unwrap();
                assert!(billed >= actual);
                assert!(billed >= volumetric);
                assert!(billed == actual || billed == volumetric);
            }
        }
    }

    #[test]
    fn missing_or_flat_dimensions_use_actual_weight() {
        assert_eq!(billing_weight(2.5, None, DIVISOR).unwrap(), 2.5);
        let flat = Dimensions::cm(30.0, 20.0, 0.0);
        assert_eq!(volumetric_weight(&flat, DIVISOR).unwrap(), 0.0);
        assert_eq!(billing_weight(2.5, Some(&flat), DIVISOR).unwrap(), 2.5);
    }

    #[test]
    fn non_positive_divisor_is_rejected() {
        let dims = Dimensions::cm(1.0, 1.0, 1.0);
        assert_eq!(
            volumetric_weight(&dims, 0.0),
            Err(CalcError::InvalidDivisor(0.0))
        );
        assert!(billing_weight(1.0, None, -5.0).is_err());
        assert!(quote_billing_weight(&[], f64::NAN).is_err());
    }

    #[test]
    fn row_and_quote_weights_scale_with_quantity() {
        let bulky = NewLineItem::new("Monitor", 199.0, 2, 3.0)
            .with_dimensions(Dimensions::cm(60.0, 40.0, 15.0))
            .into_item(LineItemId(1))
            .unwrap();
        let dense = NewLineItem::new("Dumbbell", 30.0, 3, 5.0)
            .into_item(LineItemId(2))
            .unwrap();

        // 36 000 cm³ / 5000 = 7.2 kg per monitor
        assert!(close(line_billing_weight(&bulky, DIVISOR).unwrap(), 14.4));
        assert!(close(line_billing_weight(&dense, DIVISOR).unwrap(), 15.0));
        assert!(close(
            quote_billing_weight(&[bulky, dense], DIVISOR).unwrap(),
            29.4
        ));
    }
}
