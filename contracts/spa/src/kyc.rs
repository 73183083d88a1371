// Cross-contract calls into the KYC registry. Each call traps if the registry
// rejects it, which aborts the calling invocation.

use dealdesk_common::CompanyInfo;
use soroban_sdk::{Address, Env, IntoVal, Symbol, Vec as SdkVec};

pub fn owner(env: &Env, registry: &Address) -> Address {
    env.invoke_contract(registry, &Symbol::new(env, "owner"), SdkVec::new(env))
}

pub fn is_registered(env: &Env, registry: &Address, account: &Address) -> bool {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "is_registered"),
        SdkVec::from_array(env, [account.clone().into_val(env)]),
    )
}

pub fn company_info(env: &Env, registry: &Address, account: &Address) -> CompanyInfo {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "get_company_info"),
        SdkVec::from_array(env, [account.clone().into_val(env)]),
    )
}

pub fn owner_info(env: &Env, registry: &Address) -> CompanyInfo {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "get_owner_info"),
        SdkVec::new(env),
    )
}
