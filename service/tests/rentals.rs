//! Reservation lifecycle tests running against the in-memory engine.

use common::{DateRange, Money};
use rust_decimal::Decimal;
use service::{
    command::{
        create_rental, transition_rental, CreatePurchase, CreateRental,
        CreateVehicle, DeleteRental, TransitionRental,
    },
    domain::{customer, purchase, rental, vehicle, Customer, Vehicle},
    infra::{email, InMemory},
    query, Command as _, Service,
};

fn service() -> Service<InMemory, email::Log> {
    Service::new(InMemory::new(), email::Log)
}

fn customer() -> Customer {
    Customer {
        name: "John Doe".parse().unwrap(),
        email: "john.doe@example.com".parse().unwrap(),
        phone: "555-123-4567".parse().unwrap(),
    }
}

fn period(start: &str, end: &str) -> DateRange {
    DateRange::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
}

async fn seed_vehicle(
    service: &Service<InMemory, email::Log>,
    for_rent: bool,
) -> Vehicle {
    service
        .execute(CreateVehicle {
            name: "Toyota".parse().unwrap(),
            model: "Corolla".parse().unwrap(),
            color: "Silver".parse().unwrap(),
            year: 2021,
            license_plate: "AB-123-CD".parse().unwrap(),
            kind: vehicle::Kind::Sedan,
            daily_rate: "50USD".parse().unwrap(),
            price: "15000USD".parse().unwrap(),
            for_sale: true,
            for_rent,
            image_url: None,
        })
        .await
        .unwrap()
}

async fn vehicle_by_id(
    service: &Service<InMemory, email::Log>,
    id: vehicle::Id,
) -> Vehicle {
    service
        .execute(query::vehicle::ById::by(id))
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn prices_over_all_days_of_the_period() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let rental = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: period("2026-09-01", "2026-09-03"),
        })
        .await
        .unwrap();

    assert_eq!(rental.total_price.amount, Decimal::from(150));
    assert_eq!(rental.status, rental::Status::Pending);
}

#[tokio::test]
async fn rejects_period_sharing_a_day_with_another_rental() {
    use create_rental::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let first = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: period("2026-09-01", "2026-09-05"),
        })
        .await
        .unwrap();

    let err = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: period("2026-09-05", "2026-09-07"),
        })
        .await
        .unwrap_err();
    assert!(
        matches!(err.as_ref(), E::PeriodConflict(id) if *id == first.id),
    );
}

#[tokio::test]
async fn accepts_period_adjacent_to_another_rental() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    drop(
        service
            .execute(CreateRental {
                vehicle_id: vehicle.id,
                customer: customer(),
                period: period("2026-09-01", "2026-09-05"),
            })
            .await
            .unwrap(),
    );

    assert!(service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: period("2026-09-06", "2026-09-08"),
        })
        .await
        .is_ok());
}

#[tokio::test]
async fn pending_rental_leaves_the_vehicle_claimable() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    drop(
        service
            .execute(CreateRental {
                vehicle_id: vehicle.id,
                customer: customer(),
                period: period("2026-09-01", "2026-09-05"),
            })
            .await
            .unwrap(),
    );

    assert!(vehicle_by_id(&service, vehicle.id).await.is_available);
}

#[tokio::test]
async fn rejects_vehicle_not_listed_for_rent() {
    use create_rental::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, false).await;

    let err = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: period("2026-09-01", "2026-09-03"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::VehicleNotForRent(_)));
}

#[tokio::test]
async fn rejects_purchased_vehicle() {
    use create_rental::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    drop(
        service
            .execute(CreatePurchase {
                vehicle_id: vehicle.id,
                customer: customer(),
                address: "1 Main St, Springfield".parse().unwrap(),
                payment_method: purchase::PaymentMethod::Cash,
            })
            .await
            .unwrap(),
    );

    let err = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: period("2026-09-01", "2026-09-03"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::VehicleUnavailable(_)));
}

#[tokio::test]
async fn rejects_unknown_vehicle() {
    use create_rental::ExecutionError as E;

    let service = service();

    let err = service
        .execute(CreateRental {
            vehicle_id: vehicle::Id::new(),
            customer: customer(),
            period: period("2026-09-01", "2026-09-03"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::VehicleNotExists(_)));
}

#[tokio::test]
async fn cancellation_frees_the_period_and_removes_the_record() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;
    let range = period("2026-09-01", "2026-09-05");

    let rental = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: range,
        })
        .await
        .unwrap();

    let cancelled = service
        .execute(TransitionRental {
            rental_id: rental.id,
            status: rental::Status::Cancelled,
        })
        .await
        .unwrap();
    assert_eq!(cancelled.status, rental::Status::Cancelled);

    let stored = service
        .execute(query::rental::ById::by(rental.id))
        .await
        .unwrap();
    assert!(stored.is_none());

    // The freed days are bookable again.
    assert!(service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: range,
        })
        .await
        .is_ok());
}

#[tokio::test]
async fn cancelling_twice_fails() {
    use transition_rental::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let rental = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: period("2026-09-01", "2026-09-05"),
        })
        .await
        .unwrap();

    drop(
        service
            .execute(TransitionRental {
                rental_id: rental.id,
                status: rental::Status::Cancelled,
            })
            .await
            .unwrap(),
    );

    let err = service
        .execute(TransitionRental {
            rental_id: rental.id,
            status: rental::Status::Cancelled,
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::RentalNotExists(_)));
}

#[tokio::test]
async fn completion_requires_confirmation_first() {
    use transition_rental::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let rental = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: period("2026-09-01", "2026-09-05"),
        })
        .await
        .unwrap();

    let err = service
        .execute(TransitionRental {
            rental_id: rental.id,
            status: rental::Status::Completed,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        E::InvalidTransition {
            from: rental::Status::Pending,
            to: rental::Status::Completed,
        },
    ));
}

#[tokio::test]
async fn completed_rental_is_kept_and_still_occupies_its_days() {
    use create_rental::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, true).await;
    let range = period("2026-09-01", "2026-09-05");

    let rental = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: range,
        })
        .await
        .unwrap();
    for status in [rental::Status::Confirmed, rental::Status::Completed] {
        drop(
            service
                .execute(TransitionRental {
                    rental_id: rental.id,
                    status,
                })
                .await
                .unwrap(),
        );
    }

    let stored = service
        .execute(query::rental::ById::by(rental.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, rental::Status::Completed);

    let err = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: range,
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::PeriodConflict(_)));
}

#[tokio::test]
async fn only_one_of_two_competing_rentals_wins() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let make = |period: DateRange| {
        let service = service.clone();
        async move {
            service
                .execute(CreateRental {
                    vehicle_id: vehicle.id,
                    customer: customer(),
                    period,
                })
                .await
        }
    };
    let (a, b) = tokio::join!(
        make(period("2026-09-01", "2026-09-05")),
        make(period("2026-09-03", "2026-09-07")),
    );

    assert_eq!(u32::from(a.is_ok()) + u32::from(b.is_ok()), 1);
}

#[tokio::test]
async fn deletion_is_silent_and_frees_the_period() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;
    let range = period("2026-09-01", "2026-09-05");

    let rental = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: range,
        })
        .await
        .unwrap();

    service
        .execute(DeleteRental {
            rental_id: rental.id,
        })
        .await
        .unwrap();

    assert!(service
        .execute(query::rental::ById::by(rental.id))
        .await
        .unwrap()
        .is_none());
    assert!(service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: range,
        })
        .await
        .is_ok());
}

#[tokio::test]
async fn lists_only_rentals_overlapping_the_period() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let overlapping = service
        .execute(CreateRental {
            vehicle_id: vehicle.id,
            customer: customer(),
            period: period("2026-09-01", "2026-09-05"),
        })
        .await
        .unwrap();
    drop(
        service
            .execute(CreateRental {
                vehicle_id: vehicle.id,
                customer: customer(),
                period: period("2026-09-10", "2026-09-12"),
            })
            .await
            .unwrap(),
    );

    let found = service
        .execute(query::rentals::Overlapping {
            vehicle_id: vehicle.id,
            period: period("2026-09-05", "2026-09-08"),
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, overlapping.id);
}

#[tokio::test]
async fn quotes_without_reserving() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let total: Money = service
        .execute(query::quote::RentalQuote {
            vehicle_id: vehicle.id,
            period: period("2026-09-01", "2026-09-07"),
        })
        .await
        .unwrap();
    assert_eq!(total.amount, Decimal::from(350));

    let rentals = service
        .execute(query::rentals::ForVehicle::by(vehicle.id))
        .await
        .unwrap();
    assert!(rentals.is_empty());
}

#[tokio::test]
async fn excludes_booked_vehicles_from_period_availability() {
    let service = service();
    let booked = seed_vehicle(&service, true).await;
    let free = seed_vehicle(&service, true).await;

    drop(
        service
            .execute(CreateRental {
                vehicle_id: booked.id,
                customer: customer(),
                period: period("2026-09-01", "2026-09-05"),
            })
            .await
            .unwrap(),
    );

    let available = service
        .execute(query::vehicles::AvailableIn {
            period: period("2026-09-03", "2026-09-04"),
        })
        .await
        .unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, free.id);

    let available = service
        .execute(query::vehicles::AvailableIn {
            period: period("2026-09-06", "2026-09-08"),
        })
        .await
        .unwrap();
    assert_eq!(available.len(), 2);
}

#[tokio::test]
async fn lists_rentals_by_customer_email() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    drop(
        service
            .execute(CreateRental {
                vehicle_id: vehicle.id,
                customer: customer(),
                period: period("2026-09-01", "2026-09-05"),
            })
            .await
            .unwrap(),
    );

    let mine = service
        .execute(query::rentals::ByCustomerEmail::by(
            "john.doe@example.com".parse::<customer::Email>().unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);

    let others = service
        .execute(query::rentals::ByCustomerEmail::by(
            "jane.roe@example.com".parse::<customer::Email>().unwrap(),
        ))
        .await
        .unwrap();
    assert!(others.is_empty());
}
