//! Purchase lifecycle tests running against the in-memory engine.

use service::{
    command::{
        create_purchase, transition_purchase, CreatePurchase, CreateVehicle,
        DeletePurchase, DeleteVehicle, TransitionPurchase,
    },
    domain::{customer, purchase, vehicle, Customer, Vehicle},
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

fn address() -> customer::Address {
    "1 Main St, Springfield".parse().unwrap()
}

async fn seed_vehicle(
    service: &Service<InMemory, email::Log>,
    for_sale: bool,
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
            for_sale,
            for_rent: true,
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
async fn claims_the_vehicle_immediately() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let purchase = service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::CreditCard,
        })
        .await
        .unwrap();
    assert_eq!(purchase.status, purchase::Status::Pending);
    assert_eq!(purchase.price, "15000USD".parse().unwrap());

    let claimed = vehicle_by_id(&service, vehicle.id).await;
    assert!(!claimed.is_available);
    assert_eq!(claimed.purchase_id, Some(purchase.id));
}

#[tokio::test]
async fn rejects_second_buyer() {
    use create_purchase::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    drop(
        service
            .execute(CreatePurchase {
                vehicle_id: vehicle.id,
                customer: customer(),
                address: address(),
                payment_method: purchase::PaymentMethod::Cash,
            })
            .await
            .unwrap(),
    );

    let err = service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::VehicleAlreadyPurchased(_)));
}

#[tokio::test]
async fn rejects_vehicle_not_listed_for_sale() {
    use create_purchase::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, false).await;

    let err = service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::VehicleNotForSale(_)));
}

#[tokio::test]
async fn rejects_unknown_vehicle() {
    use create_purchase::ExecutionError as E;

    let service = service();

    let err = service
        .execute(CreatePurchase {
            vehicle_id: vehicle::Id::new(),
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::VehicleNotExists(_)));
}

#[tokio::test]
async fn only_one_of_two_competing_buyers_wins() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let buy = || {
        let service = service.clone();
        async move {
            service
                .execute(CreatePurchase {
                    vehicle_id: vehicle.id,
                    customer: customer(),
                    address: address(),
                    payment_method: purchase::PaymentMethod::BankTransfer,
                })
                .await
        }
    };
    let (a, b) = tokio::join!(buy(), buy());

    assert_eq!(u32::from(a.is_ok()) + u32::from(b.is_ok()), 1);
}

#[tokio::test]
async fn completion_keeps_the_vehicle_claimed() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let purchase = service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .unwrap();

    let completed = service
        .execute(TransitionPurchase {
            purchase_id: purchase.id,
            status: purchase::Status::Completed,
        })
        .await
        .unwrap();
    assert_eq!(completed.status, purchase::Status::Completed);

    let claimed = vehicle_by_id(&service, vehicle.id).await;
    assert!(!claimed.is_available);
    assert_eq!(claimed.purchase_id, Some(purchase.id));
}

#[tokio::test]
async fn cancellation_releases_the_vehicle_and_removes_the_record() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let purchase = service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .unwrap();

    let cancelled = service
        .execute(TransitionPurchase {
            purchase_id: purchase.id,
            status: purchase::Status::Cancelled,
        })
        .await
        .unwrap();
    assert_eq!(cancelled.status, purchase::Status::Cancelled);

    assert!(service
        .execute(query::purchase::ById::by(purchase.id))
        .await
        .unwrap()
        .is_none());

    let released = vehicle_by_id(&service, vehicle.id).await;
    assert!(released.is_available);
    assert_eq!(released.purchase_id, None);

    // The released `Vehicle` can be bought again.
    assert!(service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .is_ok());
}

#[tokio::test]
async fn cancelling_twice_fails() {
    use transition_purchase::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let purchase = service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .unwrap();

    drop(
        service
            .execute(TransitionPurchase {
                purchase_id: purchase.id,
                status: purchase::Status::Cancelled,
            })
            .await
            .unwrap(),
    );

    let err = service
        .execute(TransitionPurchase {
            purchase_id: purchase.id,
            status: purchase::Status::Cancelled,
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::PurchaseNotExists(_)));
}

#[tokio::test]
async fn completed_purchase_cannot_be_cancelled() {
    use transition_purchase::ExecutionError as E;

    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let purchase = service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .unwrap();
    drop(
        service
            .execute(TransitionPurchase {
                purchase_id: purchase.id,
                status: purchase::Status::Completed,
            })
            .await
            .unwrap(),
    );

    let err = service
        .execute(TransitionPurchase {
            purchase_id: purchase.id,
            status: purchase::Status::Cancelled,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        E::InvalidTransition {
            from: purchase::Status::Completed,
            to: purchase::Status::Cancelled,
        },
    ));
}

#[tokio::test]
async fn deletion_relists_the_vehicle() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let purchase = service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .unwrap();
    drop(
        service
            .execute(TransitionPurchase {
                purchase_id: purchase.id,
                status: purchase::Status::Completed,
            })
            .await
            .unwrap(),
    );

    service
        .execute(DeletePurchase {
            purchase_id: purchase.id,
        })
        .await
        .unwrap();

    assert!(service
        .execute(query::purchase::ById::by(purchase.id))
        .await
        .unwrap()
        .is_none());

    let relisted = vehicle_by_id(&service, vehicle.id).await;
    assert!(relisted.is_available);
    assert!(relisted.for_sale);
    assert_eq!(relisted.purchase_id, None);
}

#[tokio::test]
async fn vehicle_deletion_takes_its_purchase_along() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    let purchase = service
        .execute(CreatePurchase {
            vehicle_id: vehicle.id,
            customer: customer(),
            address: address(),
            payment_method: purchase::PaymentMethod::Cash,
        })
        .await
        .unwrap();

    service
        .execute(DeleteVehicle {
            vehicle_id: vehicle.id,
        })
        .await
        .unwrap();

    assert!(service
        .execute(query::purchase::ById::by(purchase.id))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn lists_purchases_by_customer_email() {
    let service = service();
    let vehicle = seed_vehicle(&service, true).await;

    drop(
        service
            .execute(CreatePurchase {
                vehicle_id: vehicle.id,
                customer: customer(),
                address: address(),
                payment_method: purchase::PaymentMethod::Cash,
            })
            .await
            .unwrap(),
    );

    let mine = service
        .execute(query::purchases::ByCustomerEmail::by(
            "john.doe@example.com".parse::<customer::Email>().unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);

    let others = service
        .execute(query::purchases::ByCustomerEmail::by(
            "jane.roe@example.com".parse::<customer::Email>().unwrap(),
        ))
        .await
        .unwrap();
    assert!(others.is_empty());
}
