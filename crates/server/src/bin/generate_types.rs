use db::models::ticket::{CreateTicket, Ticket, UpdateTicket};
use server::routes::health::HealthInfo;
use ts_rs::TS;
use utils::response::ApiResponse;

fn generate_types_content() -> String {
    let decls = [
        Ticket::decl(),
        CreateTicket::decl(),
        UpdateTicket::decl(),
        HealthInfo::decl(),
        ApiResponse::<(), ()>::decl(),
    ];

    let mut out = String::from(
        "// This file was generated by `generate_types`. Do not edit it by hand.\n\n",
    );
    for decl in decls {
        out.push_str("export ");
        out.push_str(&decl);
        out.push_str("\n\n");
    }
    out
}

fn main() {
    print!("{}", generate_types_content());
}
